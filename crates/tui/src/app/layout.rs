use crate::app::view::View;

pub const TOP_BAR_HEIGHT: u16 = 1;
pub const LEGEND_HEIGHT: u16 = 1;
pub const STATUS_HEIGHT: u16 = 1;
/// Top and bottom border of a framed panel.
pub const VERTICAL_DECORATION: u16 = 2;

const LEFT_PANEL_MIN: u16 = 28;
const LEFT_PANEL_MAX: u16 = 48;

/// Inputs the layout is derived from; all owned by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutInputs {
    pub width: u16,
    pub height: u16,
    pub view: View,
    pub full_view: bool,
    pub show_full_help: bool,
    pub summary_items: usize,
}

/// Panel geometry, recomputed on resize and on view changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutConfig {
    pub width: u16,
    pub height: u16,
    pub top_bar_height: u16,
    pub legend_height: u16,
    pub left_panel_width: u16,
    pub summary_height: u16,
}

impl LayoutConfig {
    pub fn compute(inputs: LayoutInputs) -> Self {
        let legend_height = if inputs.show_full_help {
            LEGEND_HEIGHT * 2
        } else {
            LEGEND_HEIGHT
        };

        let left_panel_width = if inputs.view == View::Transactions && inputs.full_view {
            0
        } else if inputs.view.is_list() {
            inputs.width / 2
        } else {
            (inputs.width / 3)
                .clamp(LEFT_PANEL_MIN, LEFT_PANEL_MAX)
                .min(inputs.width)
        };

        let summary_height = if left_panel_width == 0 {
            0
        } else {
            let wanted = inputs.summary_items.max(1) as u16 + VERTICAL_DECORATION;
            wanted.min(inputs.height / 3)
        };

        Self {
            width: inputs.width,
            height: inputs.height,
            top_bar_height: TOP_BAR_HEIGHT,
            legend_height,
            left_panel_width,
            summary_height,
        }
    }

    /// Rows between the top bar and the legend/status lines.
    pub fn body_height(&self) -> u16 {
        self.height
            .saturating_sub(self.top_bar_height)
            .saturating_sub(self.legend_height)
            .saturating_sub(STATUS_HEIGHT)
    }

    /// Visible rows of the list sharing the left panel with the summary.
    pub fn list_rows(&self) -> u16 {
        self.body_height()
            .saturating_sub(VERTICAL_DECORATION)
            .saturating_sub(self.summary_height)
    }

    /// Visible rows of the full-height transaction table.
    pub fn table_rows(&self) -> u16 {
        // one extra row for the table header
        self.body_height()
            .saturating_sub(VERTICAL_DECORATION)
            .saturating_sub(1)
    }

    pub fn right_panel_width(&self) -> u16 {
        self.width.saturating_sub(self.left_panel_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(view: View) -> LayoutInputs {
        LayoutInputs {
            width: 120,
            height: 40,
            view,
            full_view: false,
            show_full_help: false,
            summary_items: 4,
        }
    }

    #[test]
    fn full_view_only_collapses_transactions() {
        let layout = LayoutConfig::compute(LayoutInputs {
            full_view: true,
            ..inputs(View::Transactions)
        });
        assert_eq!(layout.left_panel_width, 0);
        assert_eq!(layout.summary_height, 0);
        assert_eq!(layout.right_panel_width(), 120);

        let layout = LayoutConfig::compute(LayoutInputs {
            full_view: true,
            ..inputs(View::Assets)
        });
        assert_eq!(layout.left_panel_width, 60);
    }

    #[test]
    fn transaction_view_left_panel_is_clamped() {
        assert_eq!(
            LayoutConfig::compute(inputs(View::Transactions)).left_panel_width,
            40
        );
        let wide = LayoutConfig::compute(LayoutInputs {
            width: 300,
            ..inputs(View::Transactions)
        });
        assert_eq!(wide.left_panel_width, 48);
        let narrow = LayoutConfig::compute(LayoutInputs {
            width: 20,
            ..inputs(View::Transactions)
        });
        assert_eq!(narrow.left_panel_width, 20);
    }

    #[test]
    fn list_rows_follow_frame_convention() {
        let layout = LayoutConfig::compute(inputs(View::Assets));
        assert_eq!(layout.summary_height, 6);
        // 40 - top bar - legend - status - borders - summary
        assert_eq!(layout.list_rows(), 40 - 1 - 1 - 1 - 2 - 6);

        let helped = LayoutConfig::compute(LayoutInputs {
            show_full_help: true,
            ..inputs(View::Assets)
        });
        assert_eq!(helped.legend_height, 2);
        assert_eq!(helped.list_rows(), layout.list_rows() - 1);
    }

    #[test]
    fn tiny_terminal_does_not_underflow() {
        let layout = LayoutConfig::compute(LayoutInputs {
            width: 5,
            height: 3,
            ..inputs(View::Categories)
        });
        assert_eq!(layout.list_rows(), 0);
        assert_eq!(layout.table_rows(), 0);
    }
}
