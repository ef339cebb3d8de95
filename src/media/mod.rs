pub mod services;
pub mod upload;

pub use services::{discard_asset, replace_asset, upload_asset};
pub use upload::{TempUpload, UploadForm};

/// Folders assets are grouped under in the media store.
pub mod folders {
    pub const AVATARS: &str = "AVATARS";
    pub const RESUMES: &str = "MY_RESUME";
    pub const PROJECT_BANNERS: &str = "PROJECT_IMAGES";
    pub const APPLICATION_ICONS: &str = "PERSONAL_PORTFOLIO_SOFTWARE_APPLICATIONS";
}
