pub mod cubemap;
pub mod irradiance;
pub mod prefilter;
pub mod brdflut;

pub fn init_stats() {
    cubemap::init_stats();
}
