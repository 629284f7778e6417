use crate::Config;
use crate::client::{ClientId, TagMask};
use crate::geometry::Rect;
use crate::layout::LayoutKind;
use x11rb::protocol::xproto::Window;

/// Settings remembered for one tag (or for the all-tags view).
#[derive(Debug, Clone, PartialEq)]
pub struct TagSettings {
    pub master_count: u32,
    pub master_factor: f32,
    pub selected_layout: usize,
    pub layouts: [LayoutKind; 2],
    pub show_bar: bool,
}

/// Per-tag settings of one monitor. Index 0 belongs to the view that shows
/// every tag, tag `n` (zero based) lives at `n + 1`.
#[derive(Debug, Clone)]
pub struct Pertag {
    current: usize,
    previous: usize,
    tags: Vec<TagSettings>,
}

impl Pertag {
    pub fn new(config: &Config) -> Self {
        let all_tags = TagSettings {
            master_count: config.master_count,
            master_factor: config.master_factor,
            selected_layout: 0,
            layouts: config.all_tags_layouts,
            show_bar: config.show_bar,
        };
        let tags = std::iter::once(all_tags)
            .chain(config.tags.iter().map(|tag| TagSettings {
                master_count: config.master_count,
                master_factor: config.master_factor,
                selected_layout: 0,
                layouts: [tag.layout, LayoutKind::Floating],
                show_bar: config.show_bar,
            }))
            .collect();

        Self {
            current: 1,
            previous: 1,
            tags,
        }
    }

    /// Pertag slot for a non-empty tag mask: the all-tags slot for the full
    /// mask, otherwise the slot of its lowest tag.
    pub fn index_for_mask(mask: TagMask, tag_mask: TagMask) -> usize {
        if mask & tag_mask == tag_mask {
            0
        } else {
            mask.trailing_zeros() as usize + 1
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn previous_index(&self) -> usize {
        self.previous
    }

    pub fn current(&self) -> &TagSettings {
        &self.tags[self.current]
    }

    pub fn current_mut(&mut self) -> &mut TagSettings {
        &mut self.tags[self.current]
    }

    pub fn settings(&self, index: usize) -> Option<&TagSettings> {
        self.tags.get(index)
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len() - 1
    }

    fn switch_to(&mut self, index: usize) {
        self.previous = self.current;
        self.current = index;
    }

    fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.previous);
    }
}

#[derive(Debug, Clone)]
pub struct Monitor {
    pub num: usize,
    pub screen: Rect,
    pub work: Rect,
    pub bar_y: i32,
    pub tagsets: [TagMask; 2],
    pub selected_tagset: usize,
    pub layouts: [LayoutKind; 2],
    pub selected_layout: usize,
    pub master_count: u32,
    pub master_factor: f32,
    pub layout_symbol: String,
    pub show_bar: bool,
    pub top_bar: bool,
    pub bar_window: Option<Window>,
    pub selected: Option<ClientId>,
    pub(crate) clients: Option<ClientId>,
    pub(crate) stack: Option<ClientId>,
    pub pertag: Pertag,
}

impl Monitor {
    pub fn new(num: usize, screen: Rect, config: &Config, bar_height: i32) -> Self {
        let pertag = Pertag::new(config);
        let layouts = pertag.current().layouts;
        let mut monitor = Self {
            num,
            screen,
            work: screen,
            bar_y: 0,
            tagsets: [1, 1],
            selected_tagset: 0,
            layouts,
            selected_layout: 0,
            master_count: config.master_count,
            master_factor: config.master_factor,
            layout_symbol: layouts[0].symbol().to_string(),
            show_bar: config.show_bar,
            top_bar: config.top_bar,
            bar_window: None,
            selected: None,
            clients: None,
            stack: None,
            pertag,
        };
        monitor.update_bar_position(bar_height);
        monitor
    }

    pub fn tag_mask(&self) -> TagMask {
        let count = self.pertag.tag_count() as u32;
        if count >= 32 { !0 } else { (1 << count) - 1 }
    }

    pub fn active_tags(&self) -> TagMask {
        self.tagsets[self.selected_tagset]
    }

    pub fn layout(&self) -> LayoutKind {
        self.layouts[self.selected_layout]
    }

    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        self.screen.contains_point(x, y)
    }

    pub fn set_screen(&mut self, screen: Rect, bar_height: i32) {
        self.screen = screen;
        self.update_bar_position(bar_height);
    }

    /// Work area and bar position follow from the screen rectangle and the bar
    /// visibility. A hidden bar is parked just outside the screen.
    pub fn update_bar_position(&mut self, bar_height: i32) {
        self.work.x = self.screen.x;
        self.work.width = self.screen.width;
        self.work.y = self.screen.y;
        self.work.height = self.screen.height;

        if self.show_bar {
            self.work.height -= bar_height;
            if self.top_bar {
                self.bar_y = self.work.y;
                self.work.y += bar_height;
            } else {
                self.bar_y = self.work.y + self.work.height;
            }
        } else {
            self.bar_y = -bar_height;
        }
    }

    pub fn bar_rect(&self, bar_height: i32) -> Rect {
        Rect::new(self.work.x, self.bar_y, self.work.width, bar_height)
    }

    /// Shows exactly `mask`, or flips back to the previous tag set when the
    /// mask is empty. Returns false when nothing changed.
    pub fn view(&mut self, mask: TagMask) -> bool {
        let mask = mask & self.tag_mask();
        if mask == self.active_tags() {
            return false;
        }

        self.selected_tagset ^= 1;
        if mask != 0 {
            self.tagsets[self.selected_tagset] = mask;
            let index = Pertag::index_for_mask(mask, self.tag_mask());
            self.pertag.switch_to(index);
        } else {
            self.pertag.swap();
        }
        self.load_tag_settings();
        true
    }

    /// Adds or removes tags from the current view. The view never becomes
    /// empty; such requests return false and leave everything untouched.
    pub fn toggle_view(&mut self, mask: TagMask) -> bool {
        let tag_mask = self.tag_mask();
        let new_tagset = self.active_tags() ^ (mask & tag_mask);
        if new_tagset == 0 || new_tagset == self.active_tags() {
            return false;
        }

        self.tagsets[self.selected_tagset] = new_tagset;

        if new_tagset == tag_mask {
            self.pertag.switch_to(0);
        } else {
            let current = self.pertag.current_index();
            let current_still_shown = current != 0 && new_tagset & (1 << (current - 1)) != 0;
            if !current_still_shown {
                self.pertag
                    .switch_to(Pertag::index_for_mask(new_tagset, tag_mask));
            }
        }
        self.load_tag_settings();
        true
    }

    fn load_tag_settings(&mut self) {
        let settings = self.pertag.current().clone();
        self.master_count = settings.master_count;
        self.master_factor = settings.master_factor;
        self.selected_layout = settings.selected_layout;
        self.layouts = settings.layouts;
        self.show_bar = settings.show_bar;
    }

    /// Without a layout, flips to the alternate slot. With one, a different
    /// layout takes the alternate slot so the old one stays one flip away.
    pub fn set_layout(&mut self, layout: Option<LayoutKind>) {
        if layout.is_none_or(|layout| layout != self.layout()) {
            self.selected_layout ^= 1;
        }
        if let Some(layout) = layout {
            self.layouts[self.selected_layout] = layout;
        }

        let settings = self.pertag.current_mut();
        settings.selected_layout = self.selected_layout;
        settings.layouts = self.layouts;
        self.layout_symbol = self.layout().symbol().to_string();
    }

    /// Values below 1.0 are deltas, values from 1.0 up set the fraction to
    /// `value - 1.0`. Out of range results and floating layouts are refused.
    pub fn set_master_factor(&mut self, value: f32) -> bool {
        if !self.layout().arranges() {
            return false;
        }
        let factor = if value < 1.0 {
            value + self.master_factor
        } else {
            value - 1.0
        };
        if !(0.1..=0.9).contains(&factor) {
            return false;
        }
        self.master_factor = factor;
        self.pertag.current_mut().master_factor = factor;
        true
    }

    pub fn inc_master_count(&mut self, delta: i32) {
        let count = (self.master_count as i64 + delta as i64).max(0) as u32;
        self.master_count = count;
        self.pertag.current_mut().master_count = count;
    }

    pub fn toggle_bar(&mut self, bar_height: i32) {
        self.show_bar = !self.show_bar;
        self.pertag.current_mut().show_bar = self.show_bar;
        self.update_bar_position(bar_height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn monitor() -> Monitor {
        Monitor::new(0, Rect::new(0, 0, 1920, 1080), &Config::default(), 20)
    }

    #[test]
    fn test_new_monitor_uses_first_tag_layout() {
        let monitor = monitor();
        assert_eq!(monitor.active_tags(), 1);
        assert_eq!(monitor.pertag.current_index(), 1);
        assert_eq!(monitor.layout(), Config::default().tags[0].layout);
        assert_eq!(monitor.layouts[1], LayoutKind::Floating);
        assert_eq!(monitor.tag_mask(), 0x1ff);
    }

    #[test]
    fn test_bottom_bar_shrinks_work_area() {
        let monitor = monitor();
        assert_eq!(monitor.work, Rect::new(0, 0, 1920, 1060));
        assert_eq!(monitor.bar_y, 1060);
    }

    #[test]
    fn test_top_bar_moves_work_area_down() {
        let config = Config {
            top_bar: true,
            ..Config::default()
        };
        let monitor = Monitor::new(0, Rect::new(0, 0, 800, 600), &config, 20);
        assert_eq!(monitor.work, Rect::new(0, 20, 800, 580));
        assert_eq!(monitor.bar_y, 0);
    }

    #[test]
    fn test_hidden_bar_frees_the_whole_screen() {
        let mut monitor = monitor();
        monitor.toggle_bar(20);
        assert_eq!(monitor.work, monitor.screen);
        assert_eq!(monitor.bar_y, -20);
        assert!(!monitor.pertag.current().show_bar);
    }

    #[test]
    fn test_view_same_tags_is_noop() {
        let mut monitor = monitor();
        assert!(!monitor.view(1));
        assert_eq!(monitor.selected_tagset, 0);
    }

    #[test]
    fn test_view_and_back() {
        let mut monitor = monitor();
        assert!(monitor.view(1 << 3));
        assert_eq!(monitor.active_tags(), 1 << 3);
        assert_eq!(monitor.pertag.current_index(), 4);
        assert_eq!(monitor.pertag.previous_index(), 1);

        assert!(monitor.view(0));
        assert_eq!(monitor.active_tags(), 1);
        assert_eq!(monitor.pertag.current_index(), 1);
        assert_eq!(monitor.pertag.previous_index(), 4);
    }

    #[test]
    fn test_view_all_tags_uses_synthetic_slot() {
        let mut monitor = monitor();
        monitor.view(!0);
        assert_eq!(monitor.active_tags(), 0x1ff);
        assert_eq!(monitor.pertag.current_index(), 0);
        assert_eq!(monitor.layouts, Config::default().all_tags_layouts);
    }

    #[test]
    fn test_pertag_round_trip() {
        let mut monitor = monitor();
        monitor.view(1 << 1);
        monitor.inc_master_count(2);
        assert!(monitor.set_master_factor(1.3));

        monitor.view(1 << 4);
        assert_eq!(monitor.master_count, 1);
        assert_eq!(monitor.master_factor, 0.55);

        monitor.view(1 << 1);
        assert_eq!(monitor.master_count, 3);
        assert!((monitor.master_factor - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_toggle_view_never_empties() {
        let mut monitor = monitor();
        assert!(!monitor.toggle_view(1));
        assert_eq!(monitor.active_tags(), 1);
    }

    #[test]
    fn test_toggle_view_moves_current_tag_to_lowest_survivor() {
        let mut monitor = monitor();
        assert!(monitor.toggle_view(1 << 2));
        assert_eq!(monitor.active_tags(), 0b101);
        assert_eq!(monitor.pertag.current_index(), 1);

        assert!(monitor.toggle_view(1));
        assert_eq!(monitor.active_tags(), 0b100);
        assert_eq!(monitor.pertag.current_index(), 3);
    }

    #[test]
    fn test_toggle_view_to_full_set() {
        let mut monitor = monitor();
        assert!(monitor.toggle_view(0x1fe));
        assert_eq!(monitor.pertag.current_index(), 0);

        assert!(monitor.toggle_view(1 << 8));
        assert_eq!(monitor.active_tags(), 0xff);
        assert_eq!(monitor.pertag.current_index(), 1);
    }

    #[test]
    fn test_set_layout_keeps_previous_one_slot_away() {
        let mut monitor = monitor();
        monitor.view(1 << 1);
        assert_eq!(monitor.layout(), LayoutKind::Tile);

        monitor.set_layout(Some(LayoutKind::BottomStack));
        assert_eq!(monitor.layout(), LayoutKind::BottomStack);

        monitor.set_layout(None);
        assert_eq!(monitor.layout(), LayoutKind::Tile);

        monitor.set_layout(Some(LayoutKind::Tile));
        assert_eq!(monitor.layout(), LayoutKind::Tile);

        monitor.view(1 << 5);
        monitor.view(1 << 1);
        assert_eq!(monitor.layout(), LayoutKind::Tile);
        assert_eq!(monitor.layouts[monitor.selected_layout ^ 1], LayoutKind::BottomStack);
    }

    #[test]
    fn test_master_factor_bounds_and_floating() {
        let mut monitor = monitor();
        monitor.view(1 << 1);
        assert!(!monitor.set_master_factor(0.5));
        assert!(!monitor.set_master_factor(1.95));
        assert!(monitor.set_master_factor(-0.05));
        assert!((monitor.master_factor - 0.5).abs() < 1e-6);

        monitor.set_layout(Some(LayoutKind::Floating));
        assert!(!monitor.set_master_factor(0.05));
    }

    #[test]
    fn test_master_count_floors_at_zero() {
        let mut monitor = monitor();
        monitor.inc_master_count(-5);
        assert_eq!(monitor.master_count, 0);
        assert_eq!(monitor.pertag.current().master_count, 0);
    }
}
