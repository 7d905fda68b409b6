//! Self-help document templates offered alongside the legal guides.
//!
//! Each template is static text with `{{placeholder}}` tokens. Filling a
//! template replaces the tokens it has values for and leaves the rest in
//! place so the reader can see what still needs completing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentTemplate {
    SecurityDepositDemand,
    RepairRequest,
    LeaseTermination,
    ChildSupportModification,
    DuiRecordsRequest,
}

impl DocumentTemplate {
    pub const ALL: [DocumentTemplate; 5] = [
        DocumentTemplate::SecurityDepositDemand,
        DocumentTemplate::RepairRequest,
        DocumentTemplate::LeaseTermination,
        DocumentTemplate::ChildSupportModification,
        DocumentTemplate::DuiRecordsRequest,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            DocumentTemplate::SecurityDepositDemand => "security-deposit-demand",
            DocumentTemplate::RepairRequest => "repair-request",
            DocumentTemplate::LeaseTermination => "lease-termination",
            DocumentTemplate::ChildSupportModification => "child-support-modification",
            DocumentTemplate::DuiRecordsRequest => "dui-records-request",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.slug() == slug)
    }

    pub fn title(&self) -> &'static str {
        match self {
            DocumentTemplate::SecurityDepositDemand => "Security Deposit Demand Letter",
            DocumentTemplate::RepairRequest => "Request for Repairs",
            DocumentTemplate::LeaseTermination => "Notice of Lease Termination",
            DocumentTemplate::ChildSupportModification => "Request to Modify Child Support",
            DocumentTemplate::DuiRecordsRequest => "Request for DUI Arrest Records",
        }
    }

    pub fn body(&self) -> &'static str {
        match self {
            DocumentTemplate::SecurityDepositDemand => SECURITY_DEPOSIT_DEMAND,
            DocumentTemplate::RepairRequest => REPAIR_REQUEST,
            DocumentTemplate::LeaseTermination => LEASE_TERMINATION,
            DocumentTemplate::ChildSupportModification => CHILD_SUPPORT_MODIFICATION,
            DocumentTemplate::DuiRecordsRequest => DUI_RECORDS_REQUEST,
        }
    }

    /// Substitute `{{key}}` placeholders in one pass over the body. Values go
    /// in verbatim and are never scanned for placeholders themselves;
    /// placeholders without a field are left as they are.
    pub fn fill(&self, fields: &HashMap<String, String>) -> String {
        let body = self.body();
        let mut out = String::with_capacity(body.len());
        let mut rest = body;
        while let Some(open) = rest.find("{{") {
            let Some(len) = rest[open + 2..].find("}}") else {
                break;
            };
            let end = open + 2 + len + 2;
            out.push_str(&rest[..open]);
            match fields.get(&rest[open + 2..open + 2 + len]) {
                Some(value) => out.push_str(value),
                None => out.push_str(&rest[open..end]),
            }
            rest = &rest[end..];
        }
        out.push_str(rest);
        out
    }

    pub fn download(&self, fields: &HashMap<String, String>) -> TemplateDownload {
        TemplateDownload {
            file_name: format!("{}.txt", self.slug()),
            content_type: "text/plain; charset=utf-8".to_string(),
            body: self.fill(fields),
        }
    }
}

/// A filled template ready to hand to the user as a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDownload {
    pub file_name: String,
    pub content_type: String,
    pub body: String,
}

impl TemplateDownload {
    /// Write the document into `dir`, returning the full path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, AppError> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, self.body.as_bytes()).map_err(|e| {
            AppError::internal(format!("Failed to write {}: {e}", path.display()))
        })?;
        Ok(path)
    }
}

const SECURITY_DEPOSIT_DEMAND: &str = "\
{{date}}

{{landlord_name}}
{{landlord_address}}

Re: Return of security deposit for {{rental_address}}

Dear {{landlord_name}},

I moved out of {{rental_address}} on {{move_out_date}} and returned all keys.
My security deposit of {{deposit_amount}} has not been returned, and I have not
received an itemized list of deductions within the period required by law.

Please return the full deposit to the address below within 14 days of this
letter. If I do not receive it, I intend to pursue the matter in small claims
court, where I may be entitled to additional statutory damages.

Sincerely,
{{tenant_name}}
{{tenant_address}}
";

const REPAIR_REQUEST: &str = "\
{{date}}

{{landlord_name}}
{{landlord_address}}

Re: Request for repairs at {{rental_address}}

Dear {{landlord_name}},

The following conditions at my unit need repair:

{{repair_description}}

I first noticed the problem on {{first_noticed_date}}. These conditions affect
the habitability of the unit. Please arrange for the repairs within a reasonable
time, and no later than {{repair_deadline}}.

Please contact me at {{tenant_phone}} to schedule access.

Sincerely,
{{tenant_name}}
";

const LEASE_TERMINATION: &str = "\
{{date}}

{{landlord_name}}
{{landlord_address}}

Re: Notice of lease termination for {{rental_address}}

Dear {{landlord_name}},

This letter is my written notice that I will terminate my tenancy at
{{rental_address}}. My last day of occupancy will be {{termination_date}}.

Please schedule a move-out inspection and send my security deposit to
{{forwarding_address}}.

Sincerely,
{{tenant_name}}
";

const CHILD_SUPPORT_MODIFICATION: &str = "\
{{date}}

Clerk of Court
{{court_name}}

Re: Request to modify child support, case number {{case_number}}

I, {{parent_name}}, request a review of the child support order entered on
{{order_date}}. Since that order, circumstances have changed substantially:

{{change_description}}

I ask the court to schedule a hearing and recalculate support under the
current guidelines.

Respectfully,
{{parent_name}}
{{parent_address}}
";

const DUI_RECORDS_REQUEST: &str = "\
{{date}}

Records Custodian
{{agency_name}}
{{agency_address}}

Re: Public records request, arrest of {{defendant_name}} on {{arrest_date}}

I request copies of the following records related to the arrest above:
the arrest report, breath or blood test results and calibration logs, dash and
body camera footage, and dispatch recordings.

Please let me know of any fees before processing this request.

Sincerely,
{{requester_name}}
{{requester_contact}}
";
