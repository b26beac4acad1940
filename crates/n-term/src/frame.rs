// SPDX-License-Identifier: MIT
//
// Frame glyph substitution.
//
// Renderers draw boxes and table borders with the legacy line-drawing codes
// 176–223 (the CP437 block: shades, single and double lines, corners,
// tees). A dump target can't be assumed to render those, so frame cells in
// that range are replaced with a plain ASCII approximation: vertical lines
// become `|`, horizontal lines `-`, corners and junctions `+`, shades a space.

/// First legacy line-drawing code.
pub const FRAME_FIRST: u32 = 176;

/// Last legacy line-drawing code (inclusive).
pub const FRAME_LAST: u32 = 223;

/// ASCII stand-ins for codes 176–223, indexed by `code - 176`.
pub const FRAME_DUMB: &[u8; 48] = b"   ||||++||++++++--|-+||++--|-+----++++++++     ";

/// The ASCII stand-in for a frame code, or `None` if it's outside 176–223.
#[inline]
#[must_use]
pub fn dumb_frame_char(code: u32) -> Option<u8> {
    if (FRAME_FIRST..=FRAME_LAST).contains(&code) {
        let idx = usize::try_from(code - FRAME_FIRST).ok()?;
        FRAME_DUMB.get(idx).copied()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_whole_range() {
        assert_eq!(FRAME_DUMB.len(), (FRAME_LAST - FRAME_FIRST + 1) as usize);
        for code in FRAME_FIRST..=FRAME_LAST {
            assert!(dumb_frame_char(code).is_some(), "missing entry for {code}");
        }
    }

    #[test]
    fn outside_range_is_none() {
        assert_eq!(dumb_frame_char(175), None);
        assert_eq!(dumb_frame_char(224), None);
        assert_eq!(dumb_frame_char(u32::from(b'-')), None);
    }

    #[test]
    fn known_box_pieces() {
        assert_eq!(dumb_frame_char(176), Some(b' ')); // light shade
        assert_eq!(dumb_frame_char(179), Some(b'|')); // vertical
        assert_eq!(dumb_frame_char(191), Some(b'+')); // top-right corner
        assert_eq!(dumb_frame_char(196), Some(b'-')); // horizontal
        assert_eq!(dumb_frame_char(197), Some(b'+')); // cross
        assert_eq!(dumb_frame_char(205), Some(b'-')); // double horizontal
        assert_eq!(dumb_frame_char(223), Some(b' ')); // upper half block
    }

    #[test]
    fn table_is_plain_ascii() {
        assert!(FRAME_DUMB.iter().all(|&b| matches!(b, b' ' | b'|' | b'+' | b'-')));
    }
}
