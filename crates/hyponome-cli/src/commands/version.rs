//! Version command implementation.

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run() {
    println!("hyponome {VERSION}");
    println!();
    println!("A minimal remote hashing service.");
    println!();
    println!("Build info:");
    println!("  Target: {}", std::env::consts::ARCH);
    println!("  OS:     {}", std::env::consts::OS);
}
