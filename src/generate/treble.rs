//! Vendor interface files: the HAL manifest and SELinux policy fragments.

use crate::spec::{Hal, Manifest, SePolicy, Spec};

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render_hal_entry(m: &Manifest) -> String {
    let mut out = format!("    <hal format=\"{}\">\n", escape_xml(&m.format));
    out.push_str(&format!("        <name>{}</name>\n", escape_xml(&m.name)));
    if m.transport.arch.is_empty() {
        out.push_str(&format!(
            "        <transport>{}</transport>\n",
            escape_xml(&m.transport.mode)
        ));
    } else {
        out.push_str(&format!(
            "        <transport arch=\"{}\">{}</transport>\n",
            escape_xml(&m.transport.arch),
            escape_xml(&m.transport.mode)
        ));
    }
    if let Some(implementation) = &m.implementation {
        out.push_str(&format!(
            "        <impl level=\"{}\"></impl>\n",
            escape_xml(&implementation.level)
        ));
    }
    out.push_str(&format!("        <version>{}</version>\n", escape_xml(&m.version)));
    out.push_str(&format!(
        "        <interface>\n            <name>{}</name>\n            <instance>{}</instance>\n        </interface>\n",
        escape_xml(&m.interface.name),
        escape_xml(&m.interface.instance)
    ));
    out.push_str("    </hal>\n");
    out
}

/// Device manifest with every HAL's entries, HALs in name order.
pub fn render_manifest(spec: &Spec) -> String {
    let mut out = String::from("<manifest version=\"1.0\" type=\"device\">\n");
    for hal in spec.hals_by_name() {
        for m in &hal.manifests {
            out.push_str(&render_hal_entry(m));
        }
    }
    out.push_str("</manifest>\n");
    out
}

/// The policy files a HAL can contribute to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PolicyFile {
    FileTe,
    ServiceTe,
    FileContexts,
    ServiceContexts,
}

impl PolicyFile {
    pub const ALL: [PolicyFile; 4] = [
        PolicyFile::FileTe,
        PolicyFile::ServiceTe,
        PolicyFile::FileContexts,
        PolicyFile::ServiceContexts,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            PolicyFile::FileTe => "sepolicy/file.te",
            PolicyFile::ServiceTe => "sepolicy/service.te",
            PolicyFile::FileContexts => "sepolicy/file_contexts",
            PolicyFile::ServiceContexts => "sepolicy/service_contexts",
        }
    }

    pub fn lines(self, policy: &SePolicy) -> &[String] {
        match self {
            PolicyFile::FileTe => &policy.file_te,
            PolicyFile::ServiceTe => &policy.service_te,
            PolicyFile::FileContexts => &policy.file_contexts,
            PolicyFile::ServiceContexts => &policy.service_contexts,
        }
    }

    fn hal_lines(self, hal: &Hal) -> &[String] {
        hal.sepolicy.as_ref().map(|p| self.lines(p)).unwrap_or(&[])
    }

    /// True if any HAL has something for this file.
    pub fn is_used(self, spec: &Spec) -> bool {
        spec.hals.iter().any(|h| !self.hal_lines(h).is_empty())
    }
}

pub fn render_policy(spec: &Spec, file: PolicyFile) -> String {
    let mut out = String::new();
    for hal in spec.hals_by_name() {
        let lines = file.hal_lines(hal);
        if lines.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("# {}\n", hal.name));
        for line in lines {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}
