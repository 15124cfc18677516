pub mod batch;
pub mod continuity;
pub mod keyframes;
pub mod ninegrid;
pub mod projects;
pub mod video;
