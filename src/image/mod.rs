pub mod io;
pub mod traits;
pub mod window;
pub mod xyz;

pub use self::traits::{ImageView, Rows};
pub use self::window::{on_frame_border, DepthWindow};
pub use self::xyz::XyzImage;
