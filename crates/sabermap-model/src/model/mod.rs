pub use self::{beatmap::*, event::*, note::*, obstacle::*};

mod beatmap;
mod event;
mod note;
mod obstacle;
