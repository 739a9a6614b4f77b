use std::fmt;

/// One of the four lamp colors a board channel can show.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Yellow,
    Green,
    Blank, // Lamp off
}

/// Color plus "running" flag of a job, a channel, or the whole board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Status {
    pub color: Color,
    pub running: bool,
}

impl Status {
    pub const BLANK: Status = Status {
        color: Color::Blank,
        running: false,
    };

    pub fn new(color: Color, running: bool) -> Status {
        Status { color, running }
    }
}

impl Default for Status {
    fn default() -> Status {
        Status::BLANK
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "color: {:?}, running: {}", self.color, self.running)
    }
}
