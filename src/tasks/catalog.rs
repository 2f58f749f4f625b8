//! The built-in optimization table, in display order.

use super::{boot, filesystem, kernel, packages, Task, TaskCategory};

pub static CATALOG: &[Task] = &[
    Task {
        id: "reduce_ssd_writes",
        label: "Reduce SSD Writes",
        action: filesystem::reduce_ssd_writes,
        requires_reboot: true,
        description: "Optimizes SSD longevity by reducing write operations using 'noatime' and 'nodiratime'.",
        icon: "drive-harddisk-solidstate-symbolic",
        category: TaskCategory::Filesystem,
    },
    Task {
        id: "use_ram_for_temp",
        label: "Use RAM for Temp &amp; Log Files",
        action: filesystem::use_ram_for_temp,
        requires_reboot: true,
        description: "Mounts /tmp and /var/log to RAM (tmpfs) to reduce disk I/O.",
        icon: "memory-symbolic",
        category: TaskCategory::Filesystem,
    },
    Task {
        id: "sysctl_optimizations",
        label: "Apply TCP/UDP &amp; System Optimizations",
        action: kernel::apply_sysctl,
        requires_reboot: true,
        description: "Applies kernel parameters for improved network and system performance.",
        icon: "network-server-symbolic",
        category: TaskCategory::Kernel,
    },
    Task {
        id: "grub_deadline",
        label: "Set GRUB Elevator to 'deadline'",
        action: boot::grub_deadline,
        requires_reboot: true,
        description: "Changes the I/O scheduler for better disk performance on SSDs.",
        icon: "media-cdrom-symbolic",
        category: TaskCategory::Boot,
    },
    Task {
        id: "grub_kernel_security_off",
        label: "Turn Off Kernel Security Mitigations",
        action: boot::grub_security_off,
        requires_reboot: true,
        description: "Disables certain kernel security features for a slight performance gain (advanced users).",
        icon: "security-high-symbolic",
        category: TaskCategory::Boot,
    },
    Task {
        id: "grub_timeout",
        label: "Reduce GRUB Timeout to 2 seconds",
        action: boot::grub_timeout,
        requires_reboot: true,
        description: "Speeds up boot time by reducing the GRUB menu display duration.",
        icon: "hourglass-symbolic",
        category: TaskCategory::Boot,
    },
    Task {
        id: "apt_no_languages",
        label: "Remove Unnecessary Languages from Aptitude",
        action: packages::apt_no_languages,
        requires_reboot: false,
        description: "Prevents APT from downloading unneeded translation files.",
        icon: "language-symbolic",
        category: TaskCategory::Apt,
    },
    Task {
        id: "install_preload",
        label: "Install and Enable Preload",
        action: packages::install_preload,
        requires_reboot: false,
        description: "Installs Preload, an adaptive readahead daemon.",
        icon: "system-run-symbolic",
        category: TaskCategory::Packages,
    },
    Task {
        id: "install_compton",
        label: "Install Compton Screen Tear Fix (XFCE)",
        action: packages::install_compton,
        requires_reboot: true,
        description: "Installs Compton, a standalone compositor for X, to fix screen tearing.",
        icon: "display-symbolic",
        category: TaskCategory::Packages,
    },
    Task {
        id: "nvidia_powermizer",
        label: "Set NVIDIA PowerMizer to Max Performance",
        action: kernel::nvidia_powermizer,
        requires_reboot: true,
        description: "Configures NVIDIA PowerMizer for maximum performance.",
        icon: "video-display-symbolic",
        category: TaskCategory::Drivers,
    },
    Task {
        id: "install_intel_microcode",
        label: "Install Intel Microcode &amp; Non-Free Firmware",
        action: packages::install_intel_microcode,
        requires_reboot: true,
        description: "Installs essential microcode updates for Intel CPUs and non-free firmware.",
        icon: "chip-symbolic",
        category: TaskCategory::Drivers,
    },
    Task {
        id: "disable_nouveau",
        label: "Disable Nouveau Drivers",
        action: kernel::disable_nouveau,
        requires_reboot: true,
        description: "Blacklists the open-source Nouveau drivers.",
        icon: "video-display-symbolic",
        category: TaskCategory::Drivers,
    },
    Task {
        id: "remove_tlp",
        label: "Remove TLP (Fix for freezes)",
        action: packages::remove_tlp,
        requires_reboot: false,
        description: "Removes TLP (Linux Advanced Power Management) which can cause system freezes.",
        icon: "power-off-symbolic",
        category: TaskCategory::Packages,
    },
    Task {
        id: "fix_firefox_fonts",
        label: "Fix Ugly Fonts in Firefox/Librewolf",
        action: packages::fix_firefox_fonts,
        requires_reboot: false,
        description: "Installs Microsoft core fonts to improve font rendering.",
        icon: "font-x-generic-symbolic",
        category: TaskCategory::Packages,
    },
    Task {
        id: "install_xanmod",
        label: "Install XanMod Kernel (Latest Mainline)",
        action: packages::install_xanmod,
        requires_reboot: true,
        description: "Installs the XanMod kernel for responsiveness and performance.",
        icon: "drive-harddisk-system-symbolic",
        category: TaskCategory::Xanmod,
    },
    Task {
        id: "xanmod_udev_rules",
        label: "Add XanMod BFQ Scheduler Udev Rule",
        action: kernel::xanmod_udev_rules,
        requires_reboot: true,
        description: "Applies a udev rule to set the BFQ I/O scheduler for NVMe drives.",
        icon: "drive-harddisk-solidstate-symbolic",
        category: TaskCategory::Xanmod,
    },
    Task {
        id: "xanmod_cake_queue",
        label: "Set Cake Queuing Discipline (XanMod)",
        action: kernel::xanmod_cake_queue,
        requires_reboot: true,
        description: "Configures the Cake queuing discipline to improve bufferbloat.",
        icon: "network-transmit-receive-symbolic",
        category: TaskCategory::Xanmod,
    },
];
