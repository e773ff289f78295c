use ratatui::style::Color;

pub struct Theme {
    pub border_focus: Color,
    pub border_inactive: Color,
    pub title: Color,
    pub chip_fg: Color,
    pub chip_selected_fg: Color,
    pub chip_selected_bg: Color,
    pub qty_selected_fg: Color,
    pub qty_selected_bg: Color,
    pub status_info: Color,
    pub status_error: Color,
    pub placeholder: Color,
}

pub const THEME: Theme = Theme {
    border_focus: Color::Cyan,
    border_inactive: Color::DarkGray,
    title: Color::Yellow,
    chip_fg: Color::Gray,
    chip_selected_fg: Color::Black,
    chip_selected_bg: Color::Cyan,
    qty_selected_fg: Color::Black,
    qty_selected_bg: Color::Yellow,
    status_info: Color::Green,
    status_error: Color::Red,
    placeholder: Color::DarkGray,
};
