//! Demo accounts for local setups.

use super::{UserError, UserManager};
use tracing::info;

pub const TEST_USERS_PASSWORD: &str = "test123";

/// (username, email)
pub const TEST_USERS: &[(&str, &str)] = &[
    ("rajesh_bangalore", "rajesh.kumar@bangalore.in"),
    ("priya_chennai", "priya.ramesh@chennai.in"),
    ("venkat_hyderabad", "venkat.reddy@hyderabad.in"),
    ("lakshmi_kochi", "lakshmi.nair@kochi.in"),
    ("arun_mysore", "arun.rao@mysore.in"),
    ("deepa_vizag", "deepa.sastry@vizag.in"),
    ("karthik_coimbatore", "karthik.swamy@coimbatore.in"),
    ("meena_trivandrum", "meena.pillai@trivandrum.in"),
    ("suresh_madurai", "suresh.iyer@madurai.in"),
    ("anitha_mangalore", "anitha.shetty@mangalore.in"),
];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub added: Vec<String>,
    pub skipped: Vec<String>,
}

/// Creates the demo accounts, all with [`TEST_USERS_PASSWORD`]. A user whose username
/// or email is already taken is skipped.
pub fn seed_test_users(user_manager: &UserManager) -> Result<SeedReport, UserError> {
    let mut report = SeedReport::default();
    for (username, email) in TEST_USERS {
        let taken = user_manager.find_user(username)?.is_some()
            || user_manager.find_user(email)?.is_some();
        if taken {
            report.skipped.push(username.to_string());
            continue;
        }
        user_manager.add_user(username, email, TEST_USERS_PASSWORD)?;
        report.added.push(username.to_string());
    }
    info!(
        "Seeded test users: {} added, {} skipped",
        report.added.len(),
        report.skipped.len()
    );
    Ok(report)
}
