//! Kernel parameters, module blacklists and udev rules.

use super::TaskContext;
use crate::error::CommandFailure;

const SYSCTL_CONF_PATH: &str = "/etc/sysctl.d/99-custom-optimizations.conf";

const SYSCTL_CONF: &str = r#"
net.core.rmem_max=16777216
net.core.wmem_max=16777216
net.ipv4.tcp_rmem="4096 87380 16777216"
net.ipv4.tcp_wmem="4096 87380 16777216"
net.ipv4.tcp_window_scaling=1
vm.dirty_ratio=10
vm.dirty_background_ratio=5
vm.swappiness=10
vm.vfs_cache_pressure=50
"#;

pub fn apply_sysctl(ctx: &TaskContext<'_>) -> Result<(), CommandFailure> {
    ctx.run(&format!(
        "echo '{}' > {} && sysctl --system",
        SYSCTL_CONF, SYSCTL_CONF_PATH
    ))?;
    Ok(())
}

/// Nothing to run: PowerMizer is set per X session, so the operator gets the
/// command to add to their startup applications.
pub fn nvidia_powermizer(ctx: &TaskContext<'_>) -> Result<(), CommandFailure> {
    ctx.advise(r#"Add 'nvidia-settings -a "[gpu:0]/GpuPowerMizerMode=1"' to startup."#);
    Ok(())
}

pub fn disable_nouveau(ctx: &TaskContext<'_>) -> Result<(), CommandFailure> {
    let conf_file = "/etc/modprobe.d/nvidia-blacklists-nouveau.conf";
    let content = r"blacklist nouveau\noptions nouveau modeset=0";
    ctx.run(&format!(
        "echo -e '{}' > {} && update-initramfs -u",
        content, conf_file
    ))?;
    Ok(())
}

pub fn xanmod_udev_rules(ctx: &TaskContext<'_>) -> Result<(), CommandFailure> {
    let rule = r#"ACTION=="add|change", KERNEL=="nvme*", ATTR{queue/scheduler}=="bfq", ATTR{queue/iosched/low_latency}="1""#;
    ctx.run(&format!(
        "echo '{}' > /etc/udev/rules.d/60-ioschedulers.rules && udevadm control --reload-rules && udevadm trigger",
        rule
    ))?;
    Ok(())
}

pub fn xanmod_cake_queue(ctx: &TaskContext<'_>) -> Result<(), CommandFailure> {
    let conf = r"net.core.default_qdisc=cake\nnet.ipv4.tcp_congestion_control=bbr";
    ctx.run(&format!(
        "echo -e '{}' > /etc/sysctl.d/90-override.conf && sysctl --system",
        conf
    ))?;
    Ok(())
}
