//! Synthetic employee fixture generation

use crate::error::{CoreError, Result};
use crate::record::{Department, EmployeeRecord, Role};
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

/// Upper bound on rows generated in one dataset.
pub const MAX_ROWS: usize = 1_000_000;

/// Start dates are drawn from this window (inclusive). Days stop at 28
/// so every (month, day) pair is a valid date.
pub const FIRST_START_YEAR: i32 = 1990;
pub const LAST_START_YEAR: i32 = 2021;
const LAST_START_DAY: u32 = 28;

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda", "David",
    "Elizabeth", "William", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Christopher", "Karen", "Charles", "Lisa", "Daniel", "Nancy", "Matthew", "Betty", "Anthony",
    "Sandra", "Mark", "Ashley", "Donald", "Kimberly", "Steven", "Emily", "Andrew", "Donna",
    "Joshua", "Michelle", "Kevin", "Carol", "Brian", "Amanda", "Maria", "Luis", "Wei", "Priya",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White", "Harris", "Sanchez",
    "Clark", "Ramirez", "Lewis", "Robinson", "Walker", "Young", "Allen", "King", "Wright",
    "Scott", "Torres", "Nguyen", "Hill", "Flores", "Green", "Adams", "Nelson", "Baker", "Patel",
];

/// Draw a uniformly random start date from the fixed historical window.
pub fn random_start_date<R: Rng + ?Sized>(rng: &mut R) -> Result<NaiveDate> {
    let year = rng.gen_range(FIRST_START_YEAR..=LAST_START_YEAR);
    let month = rng.gen_range(1..=12);
    let day = rng.gen_range(1..=LAST_START_DAY);
    NaiveDate::from_ymd_opt(year, month, day).ok_or(CoreError::InvalidDate { year, month, day })
}

/// Generate a "First Last" name. Names repeat freely.
pub fn random_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Alex");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Doe");
    format!("{} {}", first, last)
}

/// Generate `num_rows` synthetic employees.
///
/// Department and role are drawn independently, uniformly and with
/// replacement. Fails with [`CoreError::TooManyRows`] above [`MAX_ROWS`].
pub fn generate_records<R: Rng + ?Sized>(
    num_rows: usize,
    rng: &mut R,
) -> Result<Vec<EmployeeRecord>> {
    if num_rows > MAX_ROWS {
        return Err(CoreError::TooManyRows {
            requested: num_rows,
            max: MAX_ROWS,
        });
    }

    let mut records = Vec::with_capacity(num_rows);
    for _ in 0..num_rows {
        let name = random_name(rng);
        let start_date = random_start_date(rng)?;
        let department = Department::ALL[rng.gen_range(0..Department::ALL.len())];
        let role = Role::ALL[rng.gen_range(0..Role::ALL.len())];

        records.push(EmployeeRecord {
            name,
            start_date,
            department,
            role,
        });
    }

    tracing::debug!(rows = records.len(), "Generated employee records");
    Ok(records)
}
