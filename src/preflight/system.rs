//! Host configuration checks.
//!
//! A single unrepeated run is sensitive to frequency scaling and
//! virtualization, so these are reported before the first test. They never
//! stop the run.

use serde::{Deserialize, Serialize};

const GOVERNOR_PATH: &str = "/sys/devices/system/cpu/cpu0/cpufreq/scaling_governor";
const INTEL_NO_TURBO_PATH: &str = "/sys/devices/system/cpu/intel_pstate/no_turbo";
const CPUFREQ_BOOST_PATH: &str = "/sys/devices/system/cpu/cpufreq/boost";
const CPUINFO_PATH: &str = "/proc/cpuinfo";
const PERF_USER_ACCESS_PATH: &str = "/proc/sys/kernel/perf_user_access";

/// Warning from system checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SystemWarning {
    /// CPU frequency scaling is not pinned.
    CpuGovernorNotPerformance {
        /// Current governor setting.
        current: String,
    },

    /// Turbo boost is on; cycle counts and wall time drift apart.
    TurboBoostEnabled,

    /// Running under a hypervisor; counter reads may be emulated.
    VirtualMachineDetected,

    /// The kernel does not grant EL0 access to PMU counters.
    PmuUserAccessDisabled,
}

impl SystemWarning {
    /// Get a human-readable description of the warning.
    pub fn description(&self) -> String {
        match self {
            SystemWarning::CpuGovernorNotPerformance { current } => format!(
                "CPU frequency governor is '{}'; cycle counts will vary between runs. \
                 Set with: sudo cpupower frequency-set -g performance",
                current
            ),
            SystemWarning::TurboBoostEnabled => {
                "Turbo boost is enabled; the counter frequency may not match the core clock."
                    .to_string()
            }
            SystemWarning::VirtualMachineDetected => {
                "Running in a virtual machine; counter reads may trap to the hypervisor \
                 and inflate short measurements."
                    .to_string()
            }
            SystemWarning::PmuUserAccessDisabled => {
                "perf_user_access is 0; enabling pmccntr_el0 from user space will trap. \
                 Set with: sudo sysctl kernel.perf_user_access=1"
                    .to_string()
            }
        }
    }
}

/// Run every check that applies to this host.
///
/// On platforms other than Linux this returns no warnings.
pub fn system_check() -> Vec<SystemWarning> {
    #[allow(unused_mut)]
    let mut warnings = Vec::new();

    #[cfg(target_os = "linux")]
    {
        let read = |path: &str| std::fs::read_to_string(path).ok();

        warnings.extend(read(GOVERNOR_PATH).as_deref().and_then(check_governor));
        warnings.extend(check_turbo(
            read(INTEL_NO_TURBO_PATH).as_deref(),
            read(CPUFREQ_BOOST_PATH).as_deref(),
        ));
        warnings.extend(read(CPUINFO_PATH).as_deref().and_then(check_hypervisor));
        if cfg!(aarch64_pmu) {
            warnings.extend(check_pmu_user_access(read(PERF_USER_ACCESS_PATH).as_deref()));
        }
    }

    warnings
}

fn check_governor(governor: &str) -> Option<SystemWarning> {
    let governor = governor.trim().to_lowercase();
    if governor == "performance" {
        None
    } else {
        Some(SystemWarning::CpuGovernorNotPerformance { current: governor })
    }
}

/// `no_turbo` is inverted: "0" means turbo is on.
fn check_turbo(intel_no_turbo: Option<&str>, cpufreq_boost: Option<&str>) -> Option<SystemWarning> {
    let enabled = match (intel_no_turbo, cpufreq_boost) {
        (Some(no_turbo), _) => no_turbo.trim() == "0",
        (None, Some(boost)) => boost.trim() == "1",
        (None, None) => false,
    };
    enabled.then_some(SystemWarning::TurboBoostEnabled)
}

fn check_hypervisor(cpuinfo: &str) -> Option<SystemWarning> {
    cpuinfo
        .lines()
        .filter(|line| line.starts_with("flags") || line.starts_with("Features"))
        .any(|line| line.split_whitespace().any(|flag| flag == "hypervisor"))
        .then_some(SystemWarning::VirtualMachineDetected)
}

/// A missing sysctl (pre-5.17 kernels) is not reported: access may still have
/// been granted by other means.
fn check_pmu_user_access(value: Option<&str>) -> Option<SystemWarning> {
    match value.map(str::trim) {
        Some("0") => Some(SystemWarning::PmuUserAccessDisabled),
        _ => None,
    }
}
