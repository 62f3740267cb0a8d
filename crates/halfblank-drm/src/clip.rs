//! Atomic plane clip
//!
//! Shrinking the scan-out is one atomic request on the primary plane: keep the
//! framebuffer and CRTC, then set the destination rectangle (`CRTC_*`, whole
//! pixels) and the source rectangle (`SRC_*`, 16.16 fixed point) to the same
//! region. Pixels outside the destination are not scanned out.

use drm::control::atomic::AtomicModeReq;
use drm::control::{AtomicCommitFlags, crtc, framebuffer, property};
use halfblank::Rect;
use tracing::{debug, info};

use crate::card::{Card, ControlDevice};
use crate::error::{DrmError, DrmResult};
use crate::props::PlaneProperties;

/// Destination and source rectangles for the primary plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneClip {
    pub crtc: Rect,
    pub src: Rect,
}

impl PlaneClip {
    /// Show exactly `region` of the framebuffer at the same spot on the CRTC.
    pub fn show(region: Rect) -> Self {
        Self {
            crtc: region,
            src: region,
        }
    }
}

/// One property write of the clip request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipValue {
    Framebuffer(Option<framebuffer::Handle>),
    Crtc(crtc::Handle),
    Signed(i64),
    Unsigned(u64),
}

impl ClipValue {
    fn to_property(self) -> property::Value<'static> {
        match self {
            ClipValue::Framebuffer(fb) => property::Value::Framebuffer(fb),
            ClipValue::Crtc(crtc) => property::Value::CRTC(Some(crtc)),
            ClipValue::Signed(v) => property::Value::SignedRange(v),
            ClipValue::Unsigned(v) => property::Value::UnsignedRange(v),
        }
    }
}

/// 16.16 fixed point, as `SRC_*` expects.
fn fixed(v: u32) -> u64 {
    u64::from(v) << 16
}

/// The ten property writes, in the order they are added to the request.
pub fn assignments(
    clip: &PlaneClip,
    crtc: crtc::Handle,
    fb: Option<framebuffer::Handle>,
) -> [(&'static str, ClipValue); 10] {
    [
        ("FB_ID", ClipValue::Framebuffer(fb)),
        ("CRTC_ID", ClipValue::Crtc(crtc)),
        ("CRTC_X", ClipValue::Signed(i64::from(clip.crtc.x))),
        ("CRTC_Y", ClipValue::Signed(i64::from(clip.crtc.y))),
        ("CRTC_W", ClipValue::Unsigned(u64::from(clip.crtc.width))),
        ("CRTC_H", ClipValue::Unsigned(u64::from(clip.crtc.height))),
        ("SRC_X", ClipValue::Unsigned(fixed(clip.src.x))),
        ("SRC_Y", ClipValue::Unsigned(fixed(clip.src.y))),
        ("SRC_W", ClipValue::Unsigned(fixed(clip.src.width))),
        ("SRC_H", ClipValue::Unsigned(fixed(clip.src.height))),
    ]
}

/// Build the request. Every property is resolved before anything is added,
/// so a plane lacking one of them never yields a partial request.
pub fn build_request(
    props: &PlaneProperties,
    crtc: crtc::Handle,
    fb: Option<framebuffer::Handle>,
    clip: &PlaneClip,
) -> DrmResult<AtomicModeReq> {
    let writes = assignments(clip, crtc, fb);
    let mut resolved = Vec::with_capacity(writes.len());
    for (name, value) in writes {
        resolved.push((props.handle(name)?, value));
    }

    let mut req = AtomicModeReq::new();
    for (handle, value) in resolved {
        req.add_property(props.plane(), handle, value.to_property());
    }
    Ok(req)
}

/// Apply `clip` in a single blocking atomic commit.
pub fn apply(
    card: &Card,
    props: &PlaneProperties,
    crtc: crtc::Handle,
    fb: Option<framebuffer::Handle>,
    clip: &PlaneClip,
) -> DrmResult<()> {
    let req = build_request(props, crtc, fb, clip)?;
    debug!(plane = ?props.plane(), ?clip, "Committing plane clip");
    card.atomic_commit(AtomicCommitFlags::empty(), req)
        .map_err(DrmError::Commit)?;
    info!("Plane now shows {}", clip.crtc);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::PLANE_TYPE_PRIMARY;
    use crate::props::tests::{handle, plane_with};

    const ALL: [&str; 10] = [
        "FB_ID", "CRTC_ID", "CRTC_X", "CRTC_Y", "CRTC_W", "CRTC_H", "SRC_X", "SRC_Y", "SRC_W",
        "SRC_H",
    ];

    #[test]
    fn half_clip_writes() {
        let clip = PlaneClip::show(Rect::new(0, 0, 2560, 1240));
        let crtc: crtc::Handle = handle(51);
        let fb: framebuffer::Handle = handle(77);
        let writes = assignments(&clip, crtc, Some(fb));

        let names: Vec<_> = writes.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ALL);
        assert_eq!(writes[0].1, ClipValue::Framebuffer(Some(fb)));
        assert_eq!(writes[1].1, ClipValue::Crtc(crtc));
        assert_eq!(writes[4].1, ClipValue::Unsigned(2560));
        assert_eq!(writes[5].1, ClipValue::Unsigned(1240));
        assert_eq!(writes[8].1, ClipValue::Unsigned(2560 << 16));
        assert_eq!(writes[9].1, ClipValue::Unsigned(1240 << 16));
        assert_eq!(writes[9].1, ClipValue::Unsigned(81_264_640));
    }

    #[test]
    fn offsets_are_fixed_point_in_source_only() {
        let clip = PlaneClip::show(Rect::new(0, 360, 2560, 1240));
        let writes = assignments(&clip, handle(51), None);
        assert_eq!(writes[3].1, ClipValue::Signed(360));
        assert_eq!(writes[7].1, ClipValue::Unsigned(360 << 16));
    }

    #[test]
    fn complete_plane_builds_a_request() {
        let props = plane_with(&ALL, PLANE_TYPE_PRIMARY);
        let clip = PlaneClip::show(Rect::new(0, 0, 2560, 1600));
        assert!(build_request(&props, handle(51), None, &clip).is_ok());
    }

    #[test]
    fn missing_property_aborts_before_commit() {
        let props = plane_with(&ALL[..9], PLANE_TYPE_PRIMARY);
        let clip = PlaneClip::show(Rect::new(0, 0, 2560, 1600));
        let err = build_request(&props, handle(51), None, &clip).unwrap_err();
        assert!(matches!(err, DrmError::MissingProperty { name: "SRC_H", .. }));
    }
}
