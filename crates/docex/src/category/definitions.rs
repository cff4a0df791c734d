use super::Category;
use crate::error::Result;
use crate::source::SourceRow;

/// Grouping folder segments below the category root, unsanitized.
///
/// `Ok(None)` means the row does not carry enough information to place it.
pub type GroupingFn = fn(&SourceRow) -> Result<Option<Vec<String>>>;

/// How one category is read and laid out on disk.
///
/// Every query selects the shared columns `doc_id`, `file_data`,
/// `file_name`, `file_url`, `title` and `content_type` plus the columns its
/// grouping function reads.
#[derive(Clone, Copy)]
pub struct CategoryDefinition {
    pub category: Category,
    pub root_folder: &'static str,
    pub query: &'static str,
    pub grouping: GroupingFn,
    /// Folder layout shown to users.
    pub layout: &'static str,
}

impl std::fmt::Debug for CategoryDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryDefinition")
            .field("category", &self.category)
            .field("root_folder", &self.root_folder)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

pub static DEFINITIONS: [CategoryDefinition; 9] = [
    CategoryDefinition {
        category: Category::Risk,
        root_folder: "Risk",
        query: "SELECT ra.id AS doc_id, ra.file_data, ra.file_name, ra.file_url, ra.title, ra.content_type,
                       rt.name AS risk_type, r.code AS risk_code
                FROM risk_attachments ra
                LEFT JOIN risks r ON r.id = ra.risk_id
                LEFT JOIN risk_types rt ON rt.id = r.risk_type_id
                ORDER BY ra.id",
        grouping: group_risk,
        layout: "<risk type>/<risk code>",
    },
    CategoryDefinition {
        category: Category::Incident,
        root_folder: "Incident",
        query: "SELECT ia.id AS doc_id, ia.file_data, ia.file_name, ia.file_url, ia.title, ia.content_type,
                       i.code AS incident_code
                FROM incident_attachments ia
                LEFT JOIN incidents i ON i.id = ia.incident_id
                ORDER BY ia.id",
        grouping: group_incident,
        layout: "<incident code>",
    },
    CategoryDefinition {
        category: Category::Control,
        root_folder: "Control",
        query: "SELECT ca.id AS doc_id, ca.file_data, ca.file_name, ca.file_url, ca.title, ca.content_type,
                       c.reference AS control_ref, c.title AS control_title
                FROM control_attachments ca
                LEFT JOIN controls c ON c.id = ca.control_id
                ORDER BY ca.id",
        grouping: group_control,
        layout: "<control id>_<control title>",
    },
    CategoryDefinition {
        category: Category::Action,
        root_folder: "Action",
        query: "SELECT aa.id AS doc_id, aa.file_data, aa.file_name, aa.file_url, aa.title, aa.content_type,
                       a.code AS action_code
                FROM action_attachments aa
                LEFT JOIN actions a ON a.id = aa.action_id
                ORDER BY aa.id",
        grouping: group_action,
        layout: "<action code>",
    },
    CategoryDefinition {
        category: Category::Compliance,
        root_folder: "Compliance",
        query: "SELECT ca.id AS doc_id, ca.file_data, ca.file_name, ca.file_url, ca.title, ca.content_type,
                       rg.id AS regulation_id, rg.code AS regulation_code, rg.name AS regulation_name,
                       ob.id AS obligation_id, ob.code AS obligation_code, ob.name AS obligation_name,
                       li.id AS license_id, li.code AS license_code, li.name AS license_name,
                       pm.id AS permit_id, pm.code AS permit_code, pm.name AS permit_name
                FROM compliance_attachments ca
                LEFT JOIN regulations rg ON rg.id = ca.regulation_id
                LEFT JOIN obligations ob ON ob.id = ca.obligation_id
                LEFT JOIN licenses li ON li.id = ca.license_id
                LEFT JOIN permits pm ON pm.id = ca.permit_id
                ORDER BY ca.id",
        grouping: group_compliance,
        layout: "<Regulations|Obligations|Licenses|Permits>/<code>_<name>",
    },
    CategoryDefinition {
        category: Category::AuditRecommendation,
        root_folder: "AuditRecommendation",
        query: "SELECT ra.id AS doc_id, ra.file_data, ra.file_name, ra.file_url, ra.title, ra.content_type,
                       au.audit_number, rec.recommendation_number
                FROM audit_recommendation_attachments ra
                LEFT JOIN audit_recommendations rec ON rec.id = ra.recommendation_id
                LEFT JOIN audit_findings f ON f.id = rec.finding_id
                LEFT JOIN audits au ON au.id = f.audit_id
                ORDER BY ra.id",
        grouping: group_audit_recommendation,
        layout: "<audit number>/<recommendation number>",
    },
    CategoryDefinition {
        category: Category::AuditDetails,
        root_folder: "AuditDetails",
        query: "SELECT aa.id AS doc_id, aa.file_data, aa.file_name, aa.file_url, aa.title, aa.content_type,
                       au.audit_number
                FROM audit_attachments aa
                LEFT JOIN audits au ON au.id = aa.audit_id
                ORDER BY aa.id",
        grouping: group_audit_details,
        layout: "<audit number>",
    },
    CategoryDefinition {
        category: Category::AuditFinding,
        root_folder: "AuditFinding",
        query: "SELECT fa.id AS doc_id, fa.file_data, fa.file_name, fa.file_url, fa.title, fa.content_type,
                       au.audit_number, f.finding_number
                FROM audit_finding_attachments fa
                LEFT JOIN audit_findings f ON f.id = fa.finding_id
                LEFT JOIN audits au ON au.id = f.audit_id
                ORDER BY fa.id",
        grouping: group_audit_finding,
        layout: "<audit number>/<finding number>",
    },
    CategoryDefinition {
        category: Category::Policy,
        root_folder: "Policy",
        query: "SELECT pd.id AS doc_id, pd.file_data, pd.file_name, pd.file_url, pd.title, pd.content_type,
                       p.code AS policy_code, p.title AS policy_title
                FROM policy_documents pd
                LEFT JOIN policies p ON p.id = pd.policy_id
                ORDER BY pd.id",
        grouping: group_policy,
        layout: "<policy code>_<policy title>",
    },
];

pub fn definition(category: Category) -> &'static CategoryDefinition {
    // DEFINITIONS is declared in Category::ALL order
    &DEFINITIONS[category as usize]
}

/// Text of a grouping column, empty when NULL.
fn key(row: &SourceRow, column: &str) -> Result<String> {
    Ok(row.text(column)?.unwrap_or_default())
}

/// Non-empty parts joined with `_`.
fn joined(row: &SourceRow, columns: &[&str]) -> Result<String> {
    let mut parts = Vec::with_capacity(columns.len());
    for column in columns {
        if let Some(value) = row.text(column)? {
            parts.push(value);
        }
    }
    Ok(parts.join("_"))
}

fn group_risk(row: &SourceRow) -> Result<Option<Vec<String>>> {
    Ok(Some(vec![key(row, "risk_type")?, key(row, "risk_code")?]))
}

fn group_incident(row: &SourceRow) -> Result<Option<Vec<String>>> {
    Ok(Some(vec![key(row, "incident_code")?]))
}

fn group_control(row: &SourceRow) -> Result<Option<Vec<String>>> {
    Ok(Some(vec![joined(row, &["control_ref", "control_title"])?]))
}

fn group_action(row: &SourceRow) -> Result<Option<Vec<String>>> {
    Ok(Some(vec![key(row, "action_code")?]))
}

/// Compliance documents hang off exactly one of four entity kinds.
const COMPLIANCE_ENTITIES: [(&str, &str); 4] = [
    ("Regulations", "regulation"),
    ("Obligations", "obligation"),
    ("Licenses", "license"),
    ("Permits", "permit"),
];

fn group_compliance(row: &SourceRow) -> Result<Option<Vec<String>>> {
    let mut found = None;

    for (folder, prefix) in COMPLIANCE_ENTITIES {
        if row.integer(&format!("{}_id", prefix))?.is_none() {
            continue;
        }
        if found.is_some() {
            return Ok(None);
        }
        let code = format!("{}_code", prefix);
        let name = format!("{}_name", prefix);
        let entity = joined(row, &[code.as_str(), name.as_str()])?;
        found = Some(vec![folder.to_string(), entity]);
    }

    Ok(found)
}

fn group_audit_recommendation(row: &SourceRow) -> Result<Option<Vec<String>>> {
    Ok(Some(vec![
        key(row, "audit_number")?,
        key(row, "recommendation_number")?,
    ]))
}

fn group_audit_details(row: &SourceRow) -> Result<Option<Vec<String>>> {
    Ok(Some(vec![key(row, "audit_number")?]))
}

fn group_audit_finding(row: &SourceRow) -> Result<Option<Vec<String>>> {
    Ok(Some(vec![key(row, "audit_number")?, key(row, "finding_number")?]))
}

fn group_policy(row: &SourceRow) -> Result<Option<Vec<String>>> {
    Ok(Some(vec![joined(row, &["policy_code", "policy_title"])?]))
}
