/// App IDs that show up as installed manifests but are runtime helpers, not
/// games. They are never scanned, fetched or cached.
pub const BLACKLIST: &[&str] = &[
    "228980",  // Steamworks Common Redistributables
    "1070560", // Steam Linux Runtime 1.0 (scout)
    "1391110", // Steam Linux Runtime 2.0 (soldier)
    "1628350", // Steam Linux Runtime 3.0 (sniper)
    "1493710", // Proton Experimental
    "1826330", // Proton EasyAntiCheat Runtime
    "1161040", // Proton BattlEye Runtime
];

pub fn is_blacklisted(app_id: &str) -> bool {
    BLACKLIST.contains(&app_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redistributables_are_blacklisted() {
        assert!(is_blacklisted("228980"));
        assert!(!is_blacklisted("730"));
        assert!(!is_blacklisted(""));
    }
}
