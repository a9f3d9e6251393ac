//! Employee records and their conversion to Arrow

use crate::schema::employee_schema;
use crate::Result;
use arrow::array::{ArrayRef, Date32Array, RecordBatch, StringArray};
use arrow::datatypes::Date32Type;
use chrono::NaiveDate;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Department {
    RnD,
    Sales,
    Product,
    Marketing,
}

impl Department {
    pub const ALL: [Department; 4] = [
        Department::RnD,
        Department::Sales,
        Department::Product,
        Department::Marketing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::RnD => "R&D",
            Department::Sales => "Sales",
            Department::Product => "Product",
            Department::Marketing => "Marketing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    DataEngineer,
    DataScientist,
    EngineeringManager,
    SoftwareEngineer,
    TeamLead,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::DataEngineer,
        Role::DataScientist,
        Role::EngineeringManager,
        Role::SoftwareEngineer,
        Role::TeamLead,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::DataEngineer => "Data Engineer",
            Role::DataScientist => "Data Scientist",
            Role::EngineeringManager => "Engineering Manager",
            Role::SoftwareEngineer => "Software Engineer",
            Role::TeamLead => "Team Lead",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRecord {
    pub name: String,
    pub start_date: NaiveDate,
    pub department: Department,
    pub role: Role,
}

/// Build a single record batch (in input order) from employee records.
pub fn records_to_batch(records: &[EmployeeRecord]) -> Result<RecordBatch> {
    let names: StringArray = records.iter().map(|r| Some(r.name.as_str())).collect();
    let start_dates: Date32Array = records
        .iter()
        .map(|r| Some(Date32Type::from_naive_date(r.start_date)))
        .collect();
    let departments: StringArray = records
        .iter()
        .map(|r| Some(r.department.as_str()))
        .collect();
    let roles: StringArray = records.iter().map(|r| Some(r.role.as_str())).collect();

    let columns: Vec<ArrayRef> = vec![
        Arc::new(names),
        Arc::new(start_dates),
        Arc::new(departments),
        Arc::new(roles),
    ];

    Ok(RecordBatch::try_new(employee_schema(), columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, AsArray};

    #[test]
    fn test_records_to_batch() {
        let records = vec![
            EmployeeRecord {
                name: "Ada Lovelace".to_string(),
                start_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
                department: Department::RnD,
                role: Role::DataScientist,
            },
            EmployeeRecord {
                name: "Grace Hopper".to_string(),
                start_date: NaiveDate::from_ymd_opt(2021, 12, 28).unwrap(),
                department: Department::Product,
                role: Role::TeamLead,
            },
        ];

        let batch = records_to_batch(&records).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 4);

        let names = batch.column(0).as_string::<i32>();
        assert_eq!(names.value(1), "Grace Hopper");

        let dates = batch
            .column(1)
            .as_any()
            .downcast_ref::<Date32Array>()
            .unwrap();
        assert_eq!(
            dates.value_as_date(0),
            NaiveDate::from_ymd_opt(1990, 1, 1)
        );

        let departments = batch.column(2).as_string::<i32>();
        assert_eq!(departments.value(0), "R&D");
        assert!(!departments.is_null(0));
    }

    #[test]
    fn test_empty_records() {
        let batch = records_to_batch(&[]).unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.schema(), employee_schema());
    }

    #[test]
    fn test_labels_are_distinct() {
        let mut labels: Vec<&str> = Department::ALL.iter().map(|d| d.as_str()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), Department::ALL.len());

        let mut roles: Vec<&str> = Role::ALL.iter().map(|r| r.as_str()).collect();
        roles.sort_unstable();
        roles.dedup();
        assert_eq!(roles.len(), Role::ALL.len());
    }
}
