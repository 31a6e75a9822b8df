//! Resolves the timing-model features into `cfg` flags.
//!
//! Emits `cfg(timing_model = "...")` for the one active model and
//! `cfg(aarch64_pmu)` when the privileged cycle counter is requested.

use std::env;

const MODELS: [(&str, &str); 4] = [
    ("CARGO_FEATURE_AARCH64_TIMING", "aarch64"),
    ("CARGO_FEATURE_OCTEON_TIMING", "octeon"),
    ("CARGO_FEATURE_LINUX_TIMING", "linux"),
    ("CARGO_FEATURE_X86_TIMING", "x86"),
];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rustc-check-cfg=cfg(timing_model, values(\"aarch64\", \"octeon\", \"linux\", \"x86\"))");
    println!("cargo:rustc-check-cfg=cfg(aarch64_pmu)");

    let target_arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();

    let selected: Vec<&str> = MODELS
        .iter()
        .filter(|(var, _)| env::var_os(var).is_some())
        .map(|(_, model)| *model)
        .collect();

    let model = match selected.as_slice() {
        [] => default_model(&target_arch),
        [one] => *one,
        many => panic!(
            "only one timing model feature may be enabled, got: {}",
            many.join(", ")
        ),
    };

    let arch_ok = match model {
        "aarch64" => target_arch == "aarch64",
        "octeon" => target_arch == "mips64",
        "x86" => target_arch == "x86" || target_arch == "x86_64",
        _ => true,
    };
    if !arch_ok {
        panic!(
            "timing model `{}` cannot be built for target architecture `{}`",
            model, target_arch
        );
    }

    println!("cargo:rustc-cfg=timing_model=\"{}\"", model);
    if env::var_os("CARGO_FEATURE_AARCH64_PMU").is_some() {
        println!("cargo:rustc-cfg=aarch64_pmu");
    }
}

fn default_model(target_arch: &str) -> &'static str {
    match target_arch {
        "aarch64" => "aarch64",
        "x86" | "x86_64" => "x86",
        _ => "linux",
    }
}
