use lazy_static::lazy_static;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt::Write;

type StatsCallbackFn = Box<dyn Fn(&mut StatsAccumulator) + Send>;

lazy_static! {
    static ref FUNCS: Mutex<Vec<StatsCallbackFn>> = Mutex::new(Vec::new());
    static ref STATS_ACCUMULATOR: Mutex<StatsAccumulator> = Mutex::new(StatsAccumulator::new());
}

#[macro_export]
macro_rules! stat_counter {
    ($title:expr, $f:ident) => {

        #[allow(dead_code)]
        pub mod $f {
            use $crate::core::stats::{StatsRegisterer, StatsAccumulator};
            use std::sync::atomic::{AtomicU64, Ordering};
            use std::sync::Once;

            static VALUE: AtomicU64 = AtomicU64::new(0);
            static REGISTER: Once = Once::new();

            pub fn init() {
                REGISTER.call_once(|| StatsRegisterer::register(report));
            }

            pub fn inc() {
                VALUE.fetch_add(1, Ordering::Relaxed);
            }

            pub fn add(val: u64) {
                VALUE.fetch_add(val, Ordering::Relaxed);
            }

            pub fn get() -> u64 {
                VALUE.load(Ordering::Relaxed)
            }

            fn report(accum: &mut StatsAccumulator) {
                accum.report_counter($title, VALUE.swap(0, Ordering::Relaxed));
            }
        }

    }
}

#[macro_export]
macro_rules! stat_memory_counter {
    ($title:expr, $f:ident) => {

        #[allow(dead_code)]
        pub mod $f {
            use $crate::core::stats::{StatsRegisterer, StatsAccumulator};
            use std::sync::atomic::{AtomicU64, Ordering};
            use std::sync::Once;

            static VALUE: AtomicU64 = AtomicU64::new(0);
            static REGISTER: Once = Once::new();

            pub fn init() {
                REGISTER.call_once(|| StatsRegisterer::register(report));
            }

            pub fn add(val: u64) {
                VALUE.fetch_add(val, Ordering::Relaxed);
            }

            fn report(accum: &mut StatsAccumulator) {
                accum.report_memory_counter($title, VALUE.swap(0, Ordering::Relaxed));
            }
        }
    }
}

#[macro_export]
macro_rules! stat_ratio {
    ($title:expr, $f:ident) => {

        #[allow(dead_code)]
        pub mod $f {
            use $crate::core::stats::{StatsRegisterer, StatsAccumulator};
            use std::sync::atomic::{AtomicU64, Ordering};
            use std::sync::Once;

            static NUM: AtomicU64 = AtomicU64::new(0);
            static DENOM: AtomicU64 = AtomicU64::new(0);
            static REGISTER: Once = Once::new();

            pub fn init() {
                REGISTER.call_once(|| StatsRegisterer::register(report));
            }

            pub fn add(num: u64, denom: u64) {
                NUM.fetch_add(num, Ordering::Relaxed);
                DENOM.fetch_add(denom, Ordering::Relaxed);
            }

            fn report(accum: &mut StatsAccumulator) {
                accum.report_ratio(
                    $title,
                    NUM.swap(0, Ordering::Relaxed),
                    DENOM.swap(0, Ordering::Relaxed));
            }
        }
    }
}

pub struct StatsRegisterer();

impl StatsRegisterer {
    pub fn register<F: 'static + Fn(&mut StatsAccumulator) + Send>(func: F) {
        FUNCS.lock().push(Box::new(func));
    }

    pub fn call_callbacks(accum: &mut StatsAccumulator) {
        let funcs = FUNCS.lock();

        for func in funcs.iter() {
            func(accum)
        }
    }
}

#[derive(Default)]
pub struct StatsAccumulator {
    counters        : BTreeMap<String, u64>,
    memory_counters : BTreeMap<String, u64>,
    ratios          : BTreeMap<String, (u64, u64)>
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn report_counter(&mut self, name: &str, val: u64) {
        *self.counters.entry(name.to_owned()).or_insert(0) += val;
    }

    pub fn report_memory_counter(&mut self, name: &str, val: u64) {
        *self.memory_counters.entry(name.to_owned()).or_insert(0) += val;
    }

    pub fn report_ratio(&mut self, name: &str, num: u64, denom: u64) {
        let r = self.ratios.entry(name.to_owned()).or_insert((0, 0));

        *r = (r.0 + num, r.1 + denom);
    }

    pub fn counter(&self, name: &str) -> Option<u64> {
        self.counters.get(name).copied()
    }

    pub fn clear(&mut self) {
        self.counters.clear();
        self.memory_counters.clear();
        self.ratios.clear();
    }

    /// Titles are `Category/Name`; entries are grouped by category.
    pub fn print(&self) -> String {
        let mut by_category: BTreeMap<&str, Vec<String>> = BTreeMap::new();

        for (title, v) in &self.counters {
            if *v == 0 { continue; }
            let (cat, name) = split_title(title);
            by_category.entry(cat).or_default().push(format!("{:<42}{:>12}", name, v));
        }

        for (title, v) in &self.memory_counters {
            if *v == 0 { continue; }
            let (cat, name) = split_title(title);
            let mib = *v as f64 / (1024.0 * 1024.0);
            by_category.entry(cat).or_default().push(format!("{:<42}{:>9.2} MiB", name, mib));
        }

        for (title, (num, denom)) in &self.ratios {
            if *denom == 0 { continue; }
            let (cat, name) = split_title(title);
            let ratio = *num as f64 / *denom as f64;
            by_category
                .entry(cat)
                .or_default()
                .push(format!("{:<42}{:>12} / {} ({:.2}x)", name, num, denom, ratio));
        }

        let mut out = String::from("Statistics:\n");

        for (cat, lines) in by_category {
            let _ = writeln!(out, "  {}", cat);

            for l in lines {
                let _ = writeln!(out, "    {}", l);
            }
        }

        out
    }
}

fn split_title(title: &str) -> (&str, &str) {
    match title.find('/') {
        Some(i) => (&title[..i], &title[i + 1..]),
        None => ("", title)
    }
}

pub fn init_stats() {
    STATS_ACCUMULATOR.lock().clear();
}

/// Moves every registered counter into the global accumulator.
pub fn report_stats() {
    let mut acc = STATS_ACCUMULATOR.lock();

    StatsRegisterer::call_callbacks(&mut acc);
}

pub fn print_stats() -> String {
    STATS_ACCUMULATOR.lock().print()
}
