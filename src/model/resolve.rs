//! Fallback policy for fields the backend may omit.
//!
//! Every place that needs a unit's key, name, plant label or active flag goes
//! through these accessors; nothing else chains optional fields inline.
//!
//! | value          | resolution                                 |
//! |----------------|--------------------------------------------|
//! | key            | `code`, else `id`, else none (unit ignored) |
//! | display name   | `name`, else `Greenhouse ({key})`           |
//! | plant label    | `plantType`, else `plantName`, else `Unknown` |
//! | active         | `active`, else `false`                      |

use super::unit::Unit;

pub const UNKNOWN_PLANT: &str = "Unknown";

impl Unit {
    /// Stable key the unit is stored under.
    pub fn key(&self) -> Option<&str> {
        non_blank(self.code.as_deref()).or_else(|| non_blank(self.id.as_deref()))
    }

    pub fn display_name(&self) -> String {
        match non_blank(self.name.as_deref()) {
            Some(name) => name.to_string(),
            None => format!("Greenhouse ({})", self.key().unwrap_or("-")),
        }
    }

    pub fn plant_label(&self) -> &str {
        non_blank(self.plant_type.as_deref())
            .or_else(|| non_blank(self.plant_name.as_deref()))
            .unwrap_or(UNKNOWN_PLANT)
    }

    /// Whether manual control and sensor management are permitted.
    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(false)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> Unit {
        Unit::default()
    }

    #[test]
    fn test_key_prefers_code_then_id() {
        let mut u = unit();
        assert_eq!(u.key(), None);

        u.id = Some("65f0".into());
        assert_eq!(u.key(), Some("65f0"));

        u.code = Some("GH-1".into());
        assert_eq!(u.key(), Some("GH-1"));

        u.code = Some("  ".into());
        assert_eq!(u.key(), Some("65f0"));
    }

    #[test]
    fn test_display_name_fallback() {
        let mut u = unit();
        u.code = Some("GH-2".into());
        assert_eq!(u.display_name(), "Greenhouse (GH-2)");

        u.name = Some("South house".into());
        assert_eq!(u.display_name(), "South house");
    }

    #[test]
    fn test_plant_label_chain() {
        let mut u = unit();
        assert_eq!(u.plant_label(), UNKNOWN_PLANT);

        u.plant_name = Some("Pepper".into());
        assert_eq!(u.plant_label(), "Pepper");

        u.plant_type = Some("TOMATO".into());
        assert_eq!(u.plant_label(), "TOMATO");
    }

    #[test]
    fn test_active_defaults_to_false() {
        let mut u = unit();
        assert!(!u.is_active());
        u.active = Some(true);
        assert!(u.is_active());
    }
}
