//! APT configuration and package installs/removals.

use super::TaskContext;
use crate::error::CommandFailure;

pub fn apt_no_languages(ctx: &TaskContext<'_>) -> Result<(), CommandFailure> {
    ctx.run(r#"echo 'Acquire::Languages "none";' > /etc/apt/apt.conf.d/99-no-languages"#)?;
    Ok(())
}

pub fn install_preload(ctx: &TaskContext<'_>) -> Result<(), CommandFailure> {
    ctx.run("apt-get update && apt-get install -y preload && systemctl enable --now preload")?;
    Ok(())
}

pub fn install_compton(ctx: &TaskContext<'_>) -> Result<(), CommandFailure> {
    ctx.run("apt-get update && apt-get install -y compton")?;
    ctx.advise("Compton installed. Add to startup applications.");
    Ok(())
}

pub fn install_intel_microcode(ctx: &TaskContext<'_>) -> Result<(), CommandFailure> {
    ctx.run("apt-get update && apt-get install -y intel-microcode firmware-misc-nonfree")?;
    Ok(())
}

pub fn remove_tlp(ctx: &TaskContext<'_>) -> Result<(), CommandFailure> {
    ctx.run("apt-get remove --purge -y tlp tlp-rdw")?;
    Ok(())
}

/// Pre-accepts the MS core fonts EULA so the install never prompts
pub fn fix_firefox_fonts(ctx: &TaskContext<'_>) -> Result<(), CommandFailure> {
    ctx.run(
        "echo ttf-mscorefonts-installer msttcorefonts/accepted-mscorefonts-eula select true | debconf-set-selections\n\
         apt-get update\n\
         apt-get install -y ttf-mscorefonts-installer fonts-liberation",
    )?;
    ctx.advise("Core fonts installed.");
    Ok(())
}

pub fn install_xanmod(ctx: &TaskContext<'_>) -> Result<(), CommandFailure> {
    ctx.run(
        "apt-get update && apt-get install -y wget gpg\n\
         wget -qO - https://dl.xanmod.org/archive.key | gpg --dearmor -o /usr/share/keyrings/xanmod-archive-keyring.gpg\n\
         echo 'deb [signed-by=/usr/share/keyrings/xanmod-archive-keyring.gpg] http://deb.xanmod.org releases main' > /etc/apt/sources.list.d/xanmod-release.list\n\
         apt-get update && apt-get install -y linux-xanmod-x64v3",
    )?;
    Ok(())
}
