//! Versioned cache key builders.
//!
//! Every key embeds the version of its namespace, so bumping a version makes
//! every older entry unreachable without deleting it.

/// Prefix of set-shaped tab entries.
pub const TAB_PREFIX: &str = "tab";
/// Prefix of set-shaped card entries.
pub const CARD_PREFIX: &str = "card";
/// Prefix of detail entries.
pub const DETAIL_PREFIX: &str = "di";

/// Returns the key of a list-shaped entry: `{interface}:{version}[:{id}]`.
pub fn list_key(interface: &str, version: u32, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("{}:{}:{}", interface, version, id),
        None => format!("{}:{}", interface, version),
    }
}

/// Returns the key of a set-shaped entry: `{prefix}:{interface}:{version}[:{id}]`.
pub fn set_key(prefix: &str, interface: &str, version: u32, id: Option<&str>) -> String {
    format!("{}:{}", prefix, list_key(interface, version, id))
}

/// Returns the key of one detail record: `di:{type}:{version}:{id}`.
pub fn detail_key(type_code: i32, version: u32, id: &str) -> String {
    format!("{}:{}:{}:{}", DETAIL_PREFIX, type_code, version, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_key() {
        assert_eq!(list_key("tabs_list", 0, None), "tabs_list:0");
        assert_eq!(list_key("banner", 3, Some("t1")), "banner:3:t1");
    }

    #[test]
    fn test_set_key() {
        assert_eq!(set_key(TAB_PREFIX, "tabs_v1", 2, Some("home")), "tab:tabs_v1:2:home");
        assert_eq!(set_key(CARD_PREFIX, "all_channels", 0, None), "card:all_channels:0");
    }

    #[test]
    fn test_detail_key() {
        assert_eq!(detail_key(3, 1, "m1"), "di:3:1:m1");
    }

    #[test]
    fn test_versions_never_collide() {
        assert_ne!(list_key("banner", 1, Some("t1")), list_key("banner", 2, Some("t1")));
        assert_ne!(detail_key(3, 1, "m1"), detail_key(3, 2, "m1"));
    }
}
