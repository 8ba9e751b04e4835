pub mod sphere;

pub fn init_stats() {
    sphere::init_stats();
}
