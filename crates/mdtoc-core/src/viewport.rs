/// Vertical scroll state for a document pane.
///
/// Besides plain offset bookkeeping this carries an optional *glide* target:
/// an animated scroll destination advanced one step per [`Self::tick`]. Manual
/// scrolling cancels an in-flight glide so the user always wins.
#[derive(Clone, Copy, Debug, Default)]
pub struct ViewportState {
    pub y: u32,
    pub viewport_h: u16,
    pub content_h: u32,
    glide: Option<u32>,
}

impl ViewportState {
    pub fn set_viewport(&mut self, h: u16) {
        self.viewport_h = h;
        self.clamp();
    }

    pub fn set_content(&mut self, h: u32) {
        self.content_h = h;
        self.clamp();
    }

    pub fn clamp(&mut self) {
        self.y = self.y.min(self.max_y());
    }

    /// Scrolls by `delta` rows, clamped to content. Cancels any glide.
    pub fn scroll_y_by(&mut self, delta: i32) {
        self.glide = None;
        let next = self.y as i64 + delta as i64;
        self.y = next.clamp(0, self.max_y() as i64) as u32;
    }

    pub fn page_down(&mut self) {
        self.scroll_y_by(self.viewport_h.saturating_sub(1) as i32);
    }

    pub fn page_up(&mut self) {
        self.scroll_y_by(-(self.viewport_h.saturating_sub(1) as i32));
    }

    pub fn to_top(&mut self) {
        self.glide = None;
        self.y = 0;
    }

    pub fn to_bottom(&mut self) {
        self.glide = None;
        self.y = self.max_y();
    }

    /// Starts an eased scroll toward `target` (a content row).
    pub fn glide_to(&mut self, target: u32) {
        let target = target.min(self.max_y());
        if target == self.y {
            self.glide = None;
        } else {
            self.glide = Some(target);
        }
    }

    pub fn glide_target(&self) -> Option<u32> {
        self.glide
    }

    pub fn cancel_glide(&mut self) {
        self.glide = None;
    }

    /// Advances an in-flight glide by one step. Returns `true` if the offset
    /// moved. Step size shrinks as the target nears, so the motion eases out.
    pub fn tick(&mut self) -> bool {
        let Some(target) = self.glide else {
            return false;
        };
        let target = target.min(self.max_y());
        if target == self.y {
            self.glide = None;
            return false;
        }
        let distance = target.abs_diff(self.y);
        let step = (distance / 4).max(1);
        if target > self.y {
            self.y += step;
        } else {
            self.y -= step;
        }
        if self.y == target {
            self.glide = None;
        } else {
            self.glide = Some(target);
        }
        true
    }

    pub fn percent_y(&self) -> Option<u8> {
        if self.content_h == 0 || self.viewport_h == 0 || self.content_h <= self.viewport_h as u32 {
            return None;
        }
        let visible_bottom = self.y.saturating_add(self.viewport_h as u32) as f64;
        let pct = (visible_bottom / self.content_h as f64 * 100.0).round();
        Some(pct.clamp(0.0, 100.0) as u8)
    }

    fn max_y(&self) -> u32 {
        self.content_h.saturating_sub(self.viewport_h as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(h: u16, content: u32) -> ViewportState {
        let mut s = ViewportState::default();
        s.set_viewport(h);
        s.set_content(content);
        s
    }

    #[test]
    fn scroll_clamps_to_content() {
        let mut s = viewport(10, 25);
        s.scroll_y_by(100);
        assert_eq!(s.y, 15);
        s.scroll_y_by(-100);
        assert_eq!(s.y, 0);
    }

    #[test]
    fn glide_converges_and_clears() {
        let mut s = viewport(10, 200);
        s.glide_to(40);
        let mut ticks = 0;
        while s.tick() {
            ticks += 1;
            assert!(ticks < 100, "glide did not converge");
        }
        assert_eq!(s.y, 40);
        assert_eq!(s.glide_target(), None);
    }

    #[test]
    fn manual_scroll_cancels_glide() {
        let mut s = viewport(10, 200);
        s.glide_to(100);
        s.scroll_y_by(1);
        assert_eq!(s.glide_target(), None);
        assert!(!s.tick());
    }

    #[test]
    fn glide_target_clamps_when_content_shrinks() {
        let mut s = viewport(10, 200);
        s.glide_to(150);
        s.set_content(50);
        while s.tick() {}
        assert_eq!(s.y, 40);
    }
}
