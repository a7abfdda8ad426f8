/// 8-bit RGB colour, used as the background when alpha is flattened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub fn gray(&self) -> u8 {
        ((u16::from(self.red) + u16::from(self.green) + u16::from(self.blue)) / 3) as u8
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}
