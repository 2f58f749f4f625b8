//! GRUB command line and menu tweaks. Each one regenerates the GRUB config.

use super::TaskContext;
use crate::error::CommandFailure;

pub fn grub_deadline(ctx: &TaskContext<'_>) -> Result<(), CommandFailure> {
    ctx.run(
        r#"sed -i 's/GRUB_CMDLINE_LINUX_DEFAULT="\(.*\)"/GRUB_CMDLINE_LINUX_DEFAULT="\1 elevator=deadline"/' /etc/default/grub && update-grub"#,
    )?;
    Ok(())
}

/// Replaces the whole default command line
pub fn grub_security_off(ctx: &TaskContext<'_>) -> Result<(), CommandFailure> {
    let cmdline = "quiet mitigations=off";
    ctx.run(&format!(
        r#"sed -i 's/GRUB_CMDLINE_LINUX_DEFAULT=.*/GRUB_CMDLINE_LINUX_DEFAULT="{}"/' /etc/default/grub && update-grub"#,
        cmdline
    ))?;
    Ok(())
}

pub fn grub_timeout(ctx: &TaskContext<'_>) -> Result<(), CommandFailure> {
    ctx.run("sed -i 's/GRUB_TIMEOUT=.*/GRUB_TIMEOUT=2/' /etc/default/grub && update-grub")?;
    Ok(())
}
