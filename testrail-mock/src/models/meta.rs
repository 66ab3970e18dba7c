//! Fixed TestRail-style id/name catalogs

pub const STATUS_NAMES: &[(i64, &str)] = &[
    (1, "Passed"),
    (2, "Blocked"),
    (3, "Untested"),
    (4, "Retest"),
    (5, "Failed"),
];

pub const TYPE_NAMES: &[(i64, &str)] = &[
    (1, "Functional"),
    (2, "Regression"),
    (3, "Smoke"),
    (4, "Performance"),
    (5, "Security"),
];

pub const PRIORITY_NAMES: &[(i64, &str)] = &[
    (1, "Critical"),
    (2, "High"),
    (3, "Medium"),
    (4, "Low"),
];

pub const STATUS_UNTESTED: i64 = 3;

pub fn is_valid_status(id: i64) -> bool {
    STATUS_NAMES.iter().any(|(k, _)| *k == id)
}

pub fn status_name(id: i64) -> &'static str {
    lookup(STATUS_NAMES, id)
}

pub fn type_name(id: i64) -> &'static str {
    lookup(TYPE_NAMES, id)
}

pub fn priority_name(id: i64) -> &'static str {
    lookup(PRIORITY_NAMES, id)
}

fn lookup(table: &'static [(i64, &'static str)], id: i64) -> &'static str {
    table
        .iter()
        .find(|(k, _)| *k == id)
        .map(|(_, name)| *name)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogs_resolve_names() {
        assert_eq!(status_name(1), "Passed");
        assert_eq!(status_name(5), "Failed");
        assert_eq!(status_name(99), "Unknown");
        assert_eq!(type_name(3), "Smoke");
        assert_eq!(priority_name(4), "Low");
    }

    #[test]
    fn status_validation() {
        assert!(is_valid_status(1));
        assert!(is_valid_status(5));
        assert!(!is_valid_status(0));
        assert!(!is_valid_status(999));
    }
}
