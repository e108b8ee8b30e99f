use termimad::{
    Alignment, MadSkin,
    crossterm::style::{Attribute, Color},
};

const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb { r, g, b }
}

/// One Dark colors used by the day, trends and calendar views.
pub struct OneDark;

impl OneDark {
    pub const FG: Color = rgb(0xAB, 0xB2, 0xBF);
    pub const RED: Color = rgb(0xE0, 0x6C, 0x75);
    pub const YELLOW: Color = rgb(0xE5, 0xC0, 0x7B);
    pub const GREEN: Color = rgb(0x98, 0xC3, 0x79);
    pub const BLUE: Color = rgb(0x61, 0xAF, 0xEF);
    pub const PURPLE: Color = rgb(0xC6, 0x78, 0xDD);
    pub const COMMENT: Color = rgb(0x5C, 0x63, 0x70);

    /// Day headings in red, trend sections in blue, ratings in bold yellow.
    pub fn loop_skin() -> MadSkin {
        let mut skin = MadSkin::default();
        skin.paragraph.set_fg(Self::FG);
        skin.italic.set_fg(Self::COMMENT);
        skin.bold.set_fg(Self::YELLOW);

        skin.headers[1].set_fg(Self::RED);
        skin.headers[1].add_attr(Attribute::Bold);
        skin.headers[1].align = Alignment::Left;
        skin.headers[2].set_fg(Self::BLUE);
        skin.headers[2].add_attr(Attribute::Bold);

        skin.table.set_fg(Self::COMMENT);
        skin.table.align = Alignment::Center;
        skin
    }
}
