// lints
#![allow(non_snake_case)]
#![allow(non_upper_case_globals)]


// clippy
#![cfg_attr(
    feature = "cargo-clippy",
    allow(
        clippy::upper_case_acronyms,
        clippy::many_single_char_names,
        clippy::too_many_arguments,
        clippy::excessive_precision,
        clippy::float_cmp
    )
)]

#[macro_use]
pub mod core;
pub mod shapes;
pub mod textures;
pub mod testing;
pub mod scenes;

pub fn init_stats() {
    core::stats::init_stats();
    core::mipmap::init_stats();
    core::texture::init_stats();
    core::raster::init_stats();
    core::renderer::init_stats();
    textures::init_stats();
    shapes::init_stats();
}
