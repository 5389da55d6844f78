/// Atlas geometry, fixed at construction.
///
/// All dimensions are in texels. The atlas is a single row of equally
/// sized sprite cells, so a sprite's vertical bounds are always [0, 1].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AtlasLayout {
    pub sprite_width: f32,
    pub sprite_height: f32,
    pub atlas_width: f32,
    pub atlas_height: f32,
}

impl AtlasLayout {
    pub const fn new(
        sprite_width: f32,
        sprite_height: f32,
        atlas_width: f32,
        atlas_height: f32,
    ) -> Self {
        Self {
            sprite_width,
            sprite_height,
            atlas_width,
            atlas_height,
        }
    }

    /// Single-row atlas: the atlas is exactly one sprite tall.
    pub const fn single_row(sprite_width: f32, sprite_height: f32, atlas_width: f32) -> Self {
        Self::new(sprite_width, sprite_height, atlas_width, sprite_height)
    }

    /// Number of sprite cells in the row.
    pub fn sprite_count(&self) -> u32 {
        (self.atlas_width / self.sprite_width) as u32
    }

    /// Normalized horizontal texture-coordinate bounds of one sprite.
    ///
    /// Callers must keep `index < sprite_count()`; debug builds assert it.
    /// An out-of-range index in release produces coordinates outside the
    /// atlas (with repeat wrapping, some other cell's texels); it is a
    /// contract violation, not a clamped lookup.
    pub fn sprite_bounds(&self, index: u32) -> (f32, f32) {
        debug_assert!(
            index < self.sprite_count(),
            "sprite index {index} out of range (atlas holds {})",
            self.sprite_count()
        );

        let u_start = index as f32 * self.sprite_width / self.atlas_width;
        let u_end = (index + 1) as f32 * self.sprite_width / self.atlas_width;
        (u_start, u_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_layout() -> AtlasLayout {
        AtlasLayout::single_row(32.0, 32.0, 384.0)
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    // ── sprite_bounds ─────────────────────────────────────────────────────

    #[test]
    fn first_sprite_starts_at_zero() {
        let (u_start, u_end) = demo_layout().sprite_bounds(0);
        assert_eq!(u_start, 0.0);
        assert!(close(u_end, 32.0 / 384.0));
    }

    #[test]
    fn sprite_ten_bounds() {
        let (u_start, u_end) = demo_layout().sprite_bounds(10);
        assert!(close(u_start, 320.0 / 384.0));
        assert!(close(u_end, 352.0 / 384.0));
    }

    #[test]
    fn adjacent_sprites_tile_without_gap_or_overlap() {
        let layout = demo_layout();
        for i in 0..layout.sprite_count() - 1 {
            let (_, u_end) = layout.sprite_bounds(i);
            let (next_start, _) = layout.sprite_bounds(i + 1);
            assert_eq!(u_end, next_start, "seam between sprites {i} and {}", i + 1);
        }
    }

    #[test]
    fn last_sprite_ends_at_one() {
        let layout = demo_layout();
        let (_, u_end) = layout.sprite_bounds(layout.sprite_count() - 1);
        assert!(close(u_end, 1.0));
    }

    // ── sprite_count ──────────────────────────────────────────────────────

    #[test]
    fn sprite_count_is_atlas_width_over_sprite_width() {
        assert_eq!(demo_layout().sprite_count(), 12);
    }

    #[test]
    fn sprite_count_truncates_partial_cells() {
        let layout = AtlasLayout::single_row(32.0, 32.0, 100.0);
        assert_eq!(layout.sprite_count(), 3);
    }

    // ── constructors ──────────────────────────────────────────────────────

    #[test]
    fn single_row_height_equals_sprite_height() {
        let layout = demo_layout();
        assert_eq!(layout.atlas_height, layout.sprite_height);
    }
}
