//! fstab tuning.

use super::TaskContext;
use crate::error::CommandFailure;

/// Add `noatime,nodiratime,discard` to the root mount
pub fn reduce_ssd_writes(ctx: &TaskContext<'_>) -> Result<(), CommandFailure> {
    ctx.run(r"sed -i '/\s\/\s/s/defaults/defaults,noatime,nodiratime,discard/' /etc/fstab")?;
    Ok(())
}

/// Mount `/tmp` and `/var/log` as tmpfs, once
pub fn use_ram_for_temp(ctx: &TaskContext<'_>) -> Result<(), CommandFailure> {
    ctx.run(
        "grep -q 'tmpfs /tmp' /etc/fstab || echo 'tmpfs /tmp tmpfs defaults,noatime,mode=1777 0 0' >> /etc/fstab\n\
         grep -q 'tmpfs /var/log' /etc/fstab || echo 'tmpfs /var/log tmpfs defaults,noatime,mode=0755 0 0' >> /etc/fstab",
    )?;
    Ok(())
}
