//! Name-indexed view of a plane's KMS properties.

use std::collections::HashMap;

use drm::control::{plane, property};

use crate::card::{Card, ControlDevice};
use crate::error::{DrmError, DrmResult};

/// Value of the plane `type` property for primary planes.
pub const PLANE_TYPE_PRIMARY: u64 = 1;

#[derive(Debug, Clone)]
pub struct PlaneProperties {
    plane: plane::Handle,
    by_name: HashMap<String, (property::Handle, u64)>,
}

impl PlaneProperties {
    pub fn read(card: &Card, plane: plane::Handle) -> DrmResult<Self> {
        let values = card
            .get_properties(plane)
            .map_err(|e| DrmError::PlaneProperties(plane, e))?;

        let mut entries = Vec::new();
        for (handle, value) in values {
            let info = card
                .get_property(handle)
                .map_err(|e| DrmError::PropertyInfo(handle, e))?;
            let Ok(name) = info.name().to_str() else {
                continue;
            };
            entries.push((name.to_owned(), handle, value));
        }

        Ok(Self::from_entries(plane, entries))
    }

    pub fn from_entries<I>(plane: plane::Handle, entries: I) -> Self
    where
        I: IntoIterator<Item = (String, property::Handle, u64)>,
    {
        let by_name = entries
            .into_iter()
            .map(|(name, handle, value)| (name, (handle, value)))
            .collect();
        Self { plane, by_name }
    }

    pub fn plane(&self) -> plane::Handle {
        self.plane
    }

    /// Property handle by name; a missing property is a discovery failure.
    pub fn handle(&self, name: &'static str) -> DrmResult<property::Handle> {
        self.by_name
            .get(name)
            .map(|(handle, _)| *handle)
            .ok_or(DrmError::MissingProperty {
                plane: self.plane,
                name,
            })
    }

    pub fn value(&self, name: &str) -> Option<u64> {
        self.by_name.get(name).map(|(_, value)| *value)
    }

    pub fn is_primary(&self) -> bool {
        self.value("type") == Some(PLANE_TYPE_PRIMARY)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use drm::control::from_u32;

    pub(crate) fn handle<T: From<drm::control::RawResourceHandle>>(raw: u32) -> T {
        from_u32(raw).unwrap()
    }

    pub(crate) fn plane_with(names: &[&str], plane_type: u64) -> PlaneProperties {
        let mut entries: Vec<(String, property::Handle, u64)> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), handle(100 + i as u32), 0))
            .collect();
        entries.push(("type".into(), handle(99), plane_type));
        PlaneProperties::from_entries(handle(31), entries)
    }

    #[test]
    fn lookup_by_name() {
        let props = plane_with(&["FB_ID", "CRTC_ID"], PLANE_TYPE_PRIMARY);
        assert_eq!(props.handle("FB_ID").unwrap(), handle::<property::Handle>(100));
        assert_eq!(props.handle("CRTC_ID").unwrap(), handle::<property::Handle>(101));
        assert!(props.is_primary());
    }

    #[test]
    fn missing_property_names_itself() {
        let props = plane_with(&["FB_ID"], PLANE_TYPE_PRIMARY);
        let err = props.handle("SRC_W").unwrap_err();
        assert!(matches!(err, DrmError::MissingProperty { name: "SRC_W", .. }));
        assert!(err.to_string().contains("SRC_W"));
    }

    #[test]
    fn overlay_and_cursor_planes_are_not_primary() {
        assert!(!plane_with(&[], 0).is_primary());
        assert!(!plane_with(&[], 2).is_primary());
    }
}
