//! `status` output
//!
//! Printed to stdout as an indented JSON object. The layout is fixed so other
//! scripts can grep it; key order and indentation never change.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub connector: ConnectorStatus,
    pub crtc: CrtcStatus,
    pub plane: PlaneStatus,
    pub plane_rect: PlaneRect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectorStatus {
    pub name: String,
    pub id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrtcStatus {
    pub id: u32,
    /// "WxH" of the current mode
    pub mode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaneStatus {
    pub id: u32,
    /// 0 when no framebuffer is attached
    pub fb_id: u32,
}

/// Current plane rectangles as raw property values. `crtc` is in pixels,
/// `src` in 16.16 fixed point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaneRect {
    pub crtc: RectValues,
    pub src: RectValues,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RectValues {
    pub x: u64,
    pub y: u64,
    pub w: u64,
    pub h: u64,
}

impl fmt::Display for RectValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"x\": {}, \"y\": {}, \"w\": {}, \"h\": {}}}",
            self.x, self.y, self.w, self.h
        )
    }
}

fn quoted(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{{")?;
        writeln!(
            f,
            "  \"connector\": {{\"name\": {}, \"id\": {}}},",
            quoted(&self.connector.name),
            self.connector.id
        )?;
        writeln!(
            f,
            "  \"crtc\": {{\"id\": {}, \"mode\": {}}},",
            self.crtc.id,
            quoted(&self.crtc.mode)
        )?;
        writeln!(
            f,
            "  \"plane\": {{\"id\": {}, \"fb_id\": {}}},",
            self.plane.id, self.plane.fb_id
        )?;
        writeln!(f, "  \"plane_rect\": {{")?;
        writeln!(f, "    \"crtc\": {},", self.plane_rect.crtc)?;
        writeln!(f, "    \"src\": {}", self.plane_rect.src)?;
        writeln!(f, "  }}")?;
        writeln!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StatusReport {
        StatusReport {
            connector: ConnectorStatus {
                name: "eDP-1".into(),
                id: 236,
            },
            crtc: CrtcStatus {
                id: 80,
                mode: "2560x1600".into(),
            },
            plane: PlaneStatus { id: 31, fb_id: 245 },
            plane_rect: PlaneRect {
                crtc: RectValues { x: 0, y: 0, w: 2560, h: 1240 },
                src: RectValues { x: 0, y: 0, w: 2560 << 16, h: 1240 << 16 },
            },
        }
    }

    #[test]
    fn exact_layout() {
        let expected = "{\n\
            \x20 \"connector\": {\"name\": \"eDP-1\", \"id\": 236},\n\
            \x20 \"crtc\": {\"id\": 80, \"mode\": \"2560x1600\"},\n\
            \x20 \"plane\": {\"id\": 31, \"fb_id\": 245},\n\
            \x20 \"plane_rect\": {\n\
            \x20   \"crtc\": {\"x\": 0, \"y\": 0, \"w\": 2560, \"h\": 1240},\n\
            \x20   \"src\": {\"x\": 0, \"y\": 0, \"w\": 167772160, \"h\": 81264640}\n\
            \x20 }\n\
            }\n";
        assert_eq!(sample().to_string(), expected);
    }

    #[test]
    fn output_is_valid_json_matching_serde() {
        let report = sample();
        let parsed: serde_json::Value = serde_json::from_str(&report.to_string()).unwrap();
        assert_eq!(parsed, serde_json::to_value(&report).unwrap());
        assert_eq!(parsed["plane_rect"]["src"]["h"], 1240u64 << 16);
    }

    #[test]
    fn names_are_escaped() {
        let mut report = sample();
        report.connector.name = "odd\"name".into();
        let parsed: serde_json::Value = serde_json::from_str(&report.to_string()).unwrap();
        assert_eq!(parsed["connector"]["name"], "odd\"name");
    }

    #[test]
    fn unattached_plane_reports_zero() {
        let mut report = sample();
        report.plane.fb_id = 0;
        report.plane_rect.src = RectValues { x: 0, y: 0, w: 0, h: 0 };
        assert!(report.to_string().contains("\"fb_id\": 0}"));
    }
}
