//! Ramdisk files: fstab, ueventd rules, USB gadget and init scripts.

use crate::spec::{RcScript, Spec, UeventRule, UsbGadget};

/// configfs gadget every Android device uses.
const GADGET: &str = "/config/usb_gadget/g1";

pub fn render_fstab(spec: &Spec) -> String {
    let mut out = String::new();
    for m in &spec.boot_image.rootfs_overlay.fstab.mounts {
        out.push_str(&format!(
            "{}    {}    {}    {}    {}\n",
            m.src, m.dst, m.fs_type, m.mnt_flag, m.fs_mgr_flag
        ));
    }
    out
}

fn uevent_line(rule: &UeventRule) -> String {
    if rule.attr.is_empty() {
        format!("{} {} {} {}\n", rule.node, rule.mode, rule.uid, rule.gid)
    } else {
        format!(
            "{} {} {} {} {}\n",
            rule.node, rule.attr, rule.mode, rule.uid, rule.gid
        )
    }
}

/// Board rules first, then each HAL's rules in name order.
pub fn render_ueventd(spec: &Spec) -> String {
    let mut out = String::new();
    for rule in &spec.boot_image.rootfs_overlay.uevent_rc.rules {
        out.push_str(&uevent_line(rule));
    }

    for hal in spec.hals_by_name() {
        if hal.uevent_rules.is_empty() {
            continue;
        }
        out.push_str(&format!("\n# {}\n", hal.name));
        for rule in &hal.uevent_rules {
            out.push_str(&uevent_line(rule));
        }
    }
    out
}

/// adb over a configfs gadget.
pub fn render_usb_rc(gadget: &UsbGadget) -> String {
    let strings = format!("{}/strings/0x409", GADGET);
    let config = format!("{}/configs/b.1", GADGET);

    let mut out = String::from("on early-boot\n");
    out.push_str(&format!(
        "    mkdir {g} 0770 shell shell\n\
         \x20   write {g}/idVendor 0x18D1\n\
         \x20   write {g}/idProduct 0x4EE7\n\
         \x20   mkdir {s} 0770 shell shell\n\
         \x20   write {s}/serialnumber {serial}\n\
         \x20   write {s}/manufacturer {manufacturer}\n\
         \x20   write {s}/product {product}\n\
         \x20   mkdir {g}/functions/ffs.adb\n\
         \x20   mkdir {c} 0770 shell shell\n\
         \x20   mkdir {c}/strings/0x409 0770 shell shell\n\
         \x20   setprop sys.usb.configfs 1\n\
         \x20   setprop sys.usb.controller {controller}\n",
        g = GADGET,
        s = strings,
        c = config,
        serial = gadget.serialnumber,
        manufacturer = gadget.manufacturer,
        product = gadget.product,
        controller = gadget.controller,
    ));

    out.push_str(
        "\non fs\n\
         \x20   mount configfs none /config\n\
         \x20   mkdir /dev/usb-ffs 0770 shell shell\n\
         \x20   mkdir /dev/usb-ffs/adb 0770 shell shell\n\
         \x20   mount functionfs adb /dev/usb-ffs/adb uid=2000,gid=2000\n",
    );

    out.push_str(&format!(
        "\non property:sys.usb.config=adb && property:sys.usb.configfs=1\n\
         \x20   write {c}/strings/0x409/configuration \"adb\"\n\
         \x20   symlink {g}/functions/ffs.adb {c}/f1\n\
         \x20   write {g}/UDC ${{sys.usb.controller}}\n\
         \x20   setprop sys.usb.state ${{sys.usb.config}}\n",
        g = GADGET,
        c = config,
    ));
    out
}

/// Imports, then actions, then services.
pub fn render_init_rc(rc: &RcScript) -> String {
    let mut out = String::new();
    for import in &rc.imports {
        out.push_str(&format!("import {}\n", import));
    }

    for action in &rc.actions {
        out.push_str(&format!("\non {}\n", action.triggers));
        for command in &action.commands {
            out.push_str(&format!("    {}\n", command));
        }
    }

    for service in &rc.services {
        out.push('\n');
        if service.args.is_empty() {
            out.push_str(&format!("service {} {}\n", service.name, service.path));
        } else {
            out.push_str(&format!(
                "service {} {} {}\n",
                service.name, service.path, service.args
            ));
        }
        for option in &service.options {
            out.push_str(&format!("    {}\n", option));
        }
    }
    out
}
