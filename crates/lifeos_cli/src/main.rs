//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `lifeos_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("lifeos_core ping={}", lifeos_core::ping());
    println!("lifeos_core version={}", lifeos_core::core_version());

    match lifeos_core::open_db_in_memory() {
        Ok(_) => println!("lifeos_core db=ok"),
        Err(err) => println!("lifeos_core db=error detail={err}"),
    }
}
