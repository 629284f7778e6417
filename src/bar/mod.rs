use crate::client::TagMask;
use crate::layout::LayoutKind;
use crate::state::WmState;
use serde::Deserialize;

/// Where a pointer button was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ClickRegion {
    TagBar,
    LayoutSymbol,
    StatusText,
    WindowTitle,
    ClientWindow,
    RootWindow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagCell {
    pub name: String,
    pub mask: TagMask,
    pub selected: bool,
    pub occupied: bool,
    pub urgent: bool,
    pub holds_focused_client: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TitleCell {
    pub text: String,
    pub is_floating: bool,
    pub is_fixed: bool,
}

/// Everything needed to paint one monitor's bar.
#[derive(Debug, Clone, PartialEq)]
pub struct BarContent {
    pub tags: Vec<TagCell>,
    pub layout_symbol: String,
    pub title: Option<TitleCell>,
    pub status: Option<String>,
    pub is_selected_monitor: bool,
}

/// Layout indicator with live counters: master count for the stacking
/// layouts, `focused/visible` positions for monocle and floating.
pub fn layout_symbol(state: &WmState, monitor_index: usize) -> String {
    let monitor = &state.monitors[monitor_index];
    let layout = monitor.layout();
    match layout {
        LayoutKind::Tile => format!("{} {}", layout.symbol(), monitor.master_count),
        LayoutKind::BottomStack | LayoutKind::BottomStackHorizontal => {
            format!("{} {}", layout.symbol(), monitor.master_count)
        }
        LayoutKind::GaplessGrid => layout.symbol().to_string(),
        LayoutKind::Monocle | LayoutKind::Floating => {
            let visible = state.visible_clients(monitor_index);
            let position = monitor
                .selected
                .and_then(|selected| visible.iter().position(|&id| id == selected))
                .map_or(0, |index| index + 1);
            if layout == LayoutKind::Floating {
                format!("<{}/{}>", position, visible.len())
            } else {
                format!("[{}/{}]", position, visible.len())
            }
        }
    }
}

impl BarContent {
    pub fn build(state: &WmState, monitor_index: usize, tag_names: &[String]) -> Self {
        let monitor = &state.monitors[monitor_index];
        let is_selected_monitor = monitor_index == state.selected_monitor;

        let mut occupied = 0;
        let mut urgent = 0;
        for id in state.clients_of(monitor_index) {
            let client = state.client(id);
            occupied |= client.tags;
            if client.is_urgent {
                urgent |= client.tags;
            }
        }

        let focused_tags = monitor
            .selected
            .filter(|_| is_selected_monitor)
            .map_or(0, |id| state.client(id).tags);

        let tags = tag_names
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let mask = 1 << index;
                TagCell {
                    name: name.clone(),
                    mask,
                    selected: monitor.active_tags() & mask != 0,
                    occupied: occupied & mask != 0,
                    urgent: urgent & mask != 0,
                    holds_focused_client: focused_tags & mask != 0,
                }
            })
            .filter(|cell| cell.occupied || cell.selected)
            .collect();

        let title = monitor.selected.map(|id| {
            let client = state.client(id);
            TitleCell {
                text: client.name.clone(),
                is_floating: client.is_floating,
                is_fixed: client.is_fixed,
            }
        });

        Self {
            tags,
            layout_symbol: layout_symbol(state, monitor_index),
            title,
            status: is_selected_monitor.then(|| state.status_text.clone()),
            is_selected_monitor,
        }
    }

    /// Maps a click at `x` (bar relative) to a region. Tag clicks also report
    /// the clicked tag. `text_width` must measure text the way it is drawn.
    pub fn click_region(
        &self,
        x: i32,
        bar_width: i32,
        text_width: impl Fn(&str) -> i32,
    ) -> (ClickRegion, Option<TagMask>) {
        let mut right = 0;
        for cell in &self.tags {
            right += text_width(&cell.name);
            if x < right {
                return (ClickRegion::TagBar, Some(cell.mask));
            }
        }

        if x < right + text_width(&self.layout_symbol) {
            return (ClickRegion::LayoutSymbol, None);
        }

        let status_width = self.status.as_deref().map_or(0, &text_width);
        if self.status.is_some() && x > bar_width - status_width {
            (ClickRegion::StatusText, None)
        } else {
            (ClickRegion::WindowTitle, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::{add_client, state_with_monitors};
    use pretty_assertions::assert_eq;

    fn names() -> Vec<String> {
        (1..=9).map(|n| n.to_string()).collect()
    }

    fn width(text: &str) -> i32 {
        text.len() as i32 * 10
    }

    #[test]
    fn test_vacant_tags_are_hidden() {
        let mut state = state_with_monitors(1);
        add_client(&mut state, 1, 0, 1 << 4);
        let content = BarContent::build(&state, 0, &names());
        let masks: Vec<_> = content.tags.iter().map(|cell| cell.mask).collect();
        assert_eq!(masks, vec![1, 1 << 4]);
        assert!(content.tags[0].selected);
        assert!(content.tags[1].occupied);
    }

    #[test]
    fn test_urgent_and_focused_tags() {
        let mut state = state_with_monitors(1);
        let urgent = add_client(&mut state, 1, 0, 1 << 2);
        state.client_mut(urgent).is_urgent = true;
        let focused = add_client(&mut state, 2, 0, 1);
        state.monitors[0].selected = Some(focused);

        let content = BarContent::build(&state, 0, &names());
        assert!(content.tags[0].holds_focused_client);
        assert!(content.tags[1].urgent);
        assert_eq!(content.status, Some(String::new()));
    }

    #[test]
    fn test_layout_symbols() {
        let mut state = state_with_monitors(1);
        let first = add_client(&mut state, 1, 0, 1);
        add_client(&mut state, 2, 0, 1);
        state.monitors[0].selected = Some(first);

        assert_eq!(layout_symbol(&state, 0), "[2/2]");

        state.monitors[0].set_layout(Some(LayoutKind::Tile));
        assert_eq!(layout_symbol(&state, 0), "[]= 1");

        state.monitors[0].set_layout(Some(LayoutKind::Floating));
        assert_eq!(layout_symbol(&state, 0), "<2/2>");

        state.monitors[0].set_layout(Some(LayoutKind::GaplessGrid));
        assert_eq!(layout_symbol(&state, 0), "###");
    }

    #[test]
    fn test_click_regions() {
        let mut state = state_with_monitors(1);
        add_client(&mut state, 1, 0, 1 << 1);
        state.status_text = "status".to_string();
        let content = BarContent::build(&state, 0, &names());

        assert_eq!(content.click_region(5, 1000, width), (ClickRegion::TagBar, Some(1)));
        assert_eq!(
            content.click_region(15, 1000, width),
            (ClickRegion::TagBar, Some(1 << 1))
        );
        assert_eq!(content.click_region(25, 1000, width), (ClickRegion::LayoutSymbol, None));
        assert_eq!(content.click_region(500, 1000, width), (ClickRegion::WindowTitle, None));
        assert_eq!(content.click_region(995, 1000, width), (ClickRegion::StatusText, None));
    }
}
