use ratatui::style::Style;

/// Styles shared by the document pane and the TOC sidebar.
#[derive(Clone, Debug)]
pub struct Theme {
    pub text_primary: Style,
    pub text_muted: Style,
    pub accent: Style,
    pub heading: Style,
    pub code_inline: Style,
    pub link: Style,
    pub toc_title: Style,
    pub toc_active: Style,
    pub placeholder: Style,
}

impl Default for Theme {
    fn default() -> Self {
        use ratatui::style::Stylize;

        Self {
            text_primary: Style::default(),
            text_muted: Style::default().dark_gray(),
            accent: Style::default().cyan(),
            heading: Style::default().bold(),
            code_inline: Style::default().cyan(),
            link: Style::default().blue().underlined(),
            toc_title: Style::default().bold(),
            toc_active: Style::default().cyan().bold().reversed(),
            placeholder: Style::default().dark_gray().italic(),
        }
    }
}
