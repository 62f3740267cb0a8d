//! Walk connector → encoder → CRTC → primary plane.

use drm::control::{Mode, connector, crtc, framebuffer, plane};
use halfblank::Extent;
use tracing::{debug, info, warn};

use crate::card::{Card, ControlDevice};
use crate::error::{DrmError, DrmResult};
use crate::props::PlaneProperties;
use crate::status::{ConnectorStatus, CrtcStatus, PlaneRect, PlaneStatus, RectValues, StatusReport};

/// Connector name the way the kernel prints it, e.g. "eDP-1".
pub fn connector_name(info: &connector::Info) -> String {
    format!("{}-{}", info.interface().as_str(), info.interface_id())
}

/// Pick the connector to drive: the exact `wanted` name if it is connected,
/// otherwise the first connected embedded panel. Returns an index into
/// `connected`.
pub fn choose_connector<S: AsRef<str>>(connected: &[S], wanted: Option<&str>) -> Option<usize> {
    wanted
        .and_then(|name| connected.iter().position(|c| c.as_ref() == name))
        .or_else(|| connected.iter().position(|c| c.as_ref().starts_with("eDP-")))
}

/// Everything needed to read or clip the panel's scan-out.
#[derive(Debug)]
pub struct Pipeline {
    pub connector: connector::Handle,
    pub connector_name: String,
    pub crtc: crtc::Handle,
    pub mode: Mode,
    pub plane: plane::Handle,
    pub framebuffer: Option<framebuffer::Handle>,
    pub props: PlaneProperties,
}

impl Pipeline {
    pub fn discover(card: &Card, wanted: Option<&str>) -> DrmResult<Self> {
        let resources = card.resource_handles().map_err(DrmError::Resources)?;

        let mut connected = Vec::new();
        for &handle in resources.connectors() {
            let Ok(info) = card.get_connector(handle, true) else {
                debug!(?handle, "Skipping unreadable connector");
                continue;
            };
            if info.state() == connector::State::Connected {
                connected.push(info);
            }
        }
        let names: Vec<String> = connected.iter().map(connector_name).collect();
        debug!("Connected connectors: {:?}", names);

        let index = choose_connector(&names, wanted).ok_or(DrmError::NoConnector)?;
        let connector = &connected[index];
        let connector_name = names[index].clone();
        if let Some(name) = wanted.filter(|name| *name != connector_name) {
            warn!("Connector {} not connected, using {}", name, connector_name);
        }

        let encoder = connector
            .current_encoder()
            .ok_or_else(|| DrmError::NoEncoder(connector_name.clone()))?;
        let crtc = card
            .get_encoder(encoder)
            .map_err(|e| DrmError::EncoderInfo(encoder, e))?
            .crtc()
            .ok_or(DrmError::NoCrtc(encoder))?;
        let mode = card
            .get_crtc(crtc)
            .map_err(|e| DrmError::CrtcInfo(crtc, e))?
            .mode()
            .ok_or(DrmError::NoMode(crtc))?;

        let planes = card.plane_handles().map_err(DrmError::Planes)?;
        let candidates = planes.iter().filter_map(|&handle| {
            let info = card.get_plane(handle).ok()?;
            let usable = resources.filter_crtcs(info.possible_crtcs()).contains(&crtc)
                && info.crtc() == Some(crtc);
            usable.then(|| (info, PlaneProperties::read(card, handle)))
        });
        let (info, props) = first_primary(candidates).ok_or(DrmError::NoPrimaryPlane(crtc))?;

        let (w, h) = mode.size();
        info!(
            "Using {} (crtc {:?}, {}x{}, plane {:?})",
            connector_name,
            crtc,
            w,
            h,
            info.handle()
        );
        Ok(Self {
            connector: connector.handle(),
            connector_name,
            crtc,
            mode,
            plane: info.handle(),
            framebuffer: info.framebuffer(),
            props,
        })
    }

    pub fn extent(&self) -> Extent {
        let (w, h) = self.mode.size();
        Extent::new(u32::from(w), u32::from(h))
    }

    pub fn status(&self) -> StatusReport {
        StatusReport {
            connector: ConnectorStatus {
                name: self.connector_name.clone(),
                id: u32::from(self.connector),
            },
            crtc: CrtcStatus {
                id: u32::from(self.crtc),
                mode: self.extent().to_string(),
            },
            plane: PlaneStatus {
                id: u32::from(self.plane),
                fb_id: self.framebuffer.map(u32::from).unwrap_or(0),
            },
            plane_rect: plane_rect(&self.props),
        }
    }
}

/// First candidate whose properties mark it primary. Planes whose properties
/// could not be read are skipped.
pub fn first_primary<T, I>(candidates: I) -> Option<(T, PlaneProperties)>
where
    I: IntoIterator<Item = (T, DrmResult<PlaneProperties>)>,
{
    candidates.into_iter().find_map(|(plane, props)| match props {
        Ok(props) if props.is_primary() => Some((plane, props)),
        Ok(_) => None,
        Err(e) => {
            debug!("Skipping plane: {}", e);
            None
        }
    })
}

/// Raw `CRTC_*` and `SRC_*` values, unconverted. Missing properties read as 0.
pub fn plane_rect(props: &PlaneProperties) -> PlaneRect {
    let prop = |name: &str| props.value(name).unwrap_or(0);
    let rect = |prefix: &str| RectValues {
        x: prop(&format!("{prefix}_X")),
        y: prop(&format!("{prefix}_Y")),
        w: prop(&format!("{prefix}_W")),
        h: prop(&format!("{prefix}_H")),
    };
    PlaneRect {
        crtc: rect("CRTC"),
        src: rect("SRC"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::PLANE_TYPE_PRIMARY;
    use crate::props::tests::{handle, plane_with};

    fn clipped_plane() -> PlaneProperties {
        let values = [
            ("CRTC_X", 0),
            ("CRTC_Y", 0),
            ("CRTC_W", 2560),
            ("CRTC_H", 1240),
            ("SRC_X", 0),
            ("SRC_Y", 0),
            ("SRC_W", 2560 << 16),
            ("SRC_H", 1240 << 16),
        ];
        let entries = values
            .iter()
            .enumerate()
            .map(|(i, (name, value))| (name.to_string(), handle(100 + i as u32), *value));
        PlaneProperties::from_entries(handle(31), entries)
    }

    #[test]
    fn plane_rect_keeps_raw_property_values() {
        let rect = plane_rect(&clipped_plane());
        assert_eq!(rect.crtc, RectValues { x: 0, y: 0, w: 2560, h: 1240 });
        assert_eq!(rect.src, RectValues { x: 0, y: 0, w: 167772160, h: 81264640 });
    }

    #[test]
    fn printed_report_shows_fixed_point_source() {
        let report = StatusReport {
            connector: ConnectorStatus {
                name: "eDP-1".into(),
                id: 236,
            },
            crtc: CrtcStatus {
                id: 80,
                mode: "2560x1600".into(),
            },
            plane: PlaneStatus { id: 31, fb_id: 245 },
            plane_rect: plane_rect(&clipped_plane()),
        };
        let text = report.to_string();
        assert!(text.contains("    \"crtc\": {\"x\": 0, \"y\": 0, \"w\": 2560, \"h\": 1240},\n"));
        assert!(text.contains("    \"src\": {\"x\": 0, \"y\": 0, \"w\": 167772160, \"h\": 81264640}\n"));
    }

    #[test]
    fn missing_rect_properties_read_as_zero() {
        let props = PlaneProperties::from_entries(handle(31), Vec::new());
        let rect = plane_rect(&props);
        assert_eq!(rect.src, RectValues { x: 0, y: 0, w: 0, h: 0 });
    }

    #[test]
    fn unreadable_plane_is_skipped() {
        let unreadable = DrmError::PlaneProperties(
            handle(30),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        let candidates: Vec<(&str, DrmResult<PlaneProperties>)> = vec![
            ("cursor", Ok(plane_with(&[], 2))),
            ("broken", Err(unreadable)),
            ("primary", Ok(plane_with(&["FB_ID"], PLANE_TYPE_PRIMARY))),
        ];
        let (name, props) = first_primary(candidates).unwrap();
        assert_eq!(name, "primary");
        assert!(props.is_primary());
    }

    #[test]
    fn no_primary_among_candidates() {
        let candidates: Vec<(&str, DrmResult<PlaneProperties>)> =
            vec![("overlay", Ok(plane_with(&[], 0)))];
        assert!(first_primary(candidates).is_none());
    }

    #[test]
    fn exact_name_wins() {
        let connected = ["eDP-1", "DP-2", "HDMI-A-1"];
        assert_eq!(choose_connector(&connected, Some("DP-2")), Some(1));
    }

    #[test]
    fn unknown_name_falls_back_to_embedded_panel() {
        let connected = ["DP-1", "eDP-1"];
        assert_eq!(choose_connector(&connected, Some("DP-9")), Some(1));
        assert_eq!(choose_connector(&["DP-1"], Some("DP-9")), None);
    }

    #[test]
    fn falls_back_to_first_embedded_panel() {
        let connected = ["DP-1", "eDP-2", "eDP-1"];
        assert_eq!(choose_connector(&connected, None), Some(1));
    }

    #[test]
    fn external_only_finds_nothing() {
        let connected = ["DP-1", "HDMI-A-1"];
        assert_eq!(choose_connector(&connected, None), None);
        assert_eq!(choose_connector::<&str>(&[], None), None);
    }
}
