use crate::model::attendance::Attendance;
use crate::model::career::Career;
use crate::model::contact::Contact;
use crate::model::document::EmployeeDocument;
use crate::model::education::{EducationEntry, EducationRecord};
use crate::model::employee::EmployeeProfile;
use crate::model::handbook::HandbookFile;
use crate::model::leave_request::LeaveRequest;
use crate::model::product::Product;
use crate::model::resource::Resource;
use crate::model::task::Task;
use crate::model::team_member::TeamMember;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{openapi, Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Matrica Networks API",
        version = "1.0.0",
        description = r#"
## Matrica Networks

This API serves the **Matrica Networks** cybersecurity company site and its internal employee portal.

### 🔹 Key Features
- **Public Site**
  - Contact form, team roster, career openings, products, and knowledge resources
- **Admin Portal**
  - Content management for every site section plus the employee register
- **Employee Portal**
  - Profile, education history, documents, leave requests, tasks, and attendance punches

### 🔐 Security
Employee portal endpoints identify the caller through the **X-Employee-ID** header.

### 📦 Response Format
Every endpoint answers HTTP 200 with a JSON envelope:
`{"success": true, ...}` on success and `{"success": false, "error": "..."}` on failure.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::contacts::list_contacts,
        crate::api::contacts::submit_contact,

        crate::api::team::list_team,
        crate::api::team::add_team_member,
        crate::api::team::delete_team_member,

        crate::api::careers::list_careers,
        crate::api::careers::add_career,
        crate::api::careers::update_career,
        crate::api::careers::delete_career,

        crate::api::products::list_products,
        crate::api::products::add_product,
        crate::api::products::delete_product,

        crate::api::resources::list_resources,
        crate::api::resources::add_resource,
        crate::api::resources::update_resource,
        crate::api::resources::delete_resource,

        crate::api::admin_auth::admin_login,
        crate::api::employee_auth::employee_login,

        crate::api::employee_admin::list_employees,
        crate::api::employee_admin::create_employee,
        crate::api::employee_admin::update_employee,
        crate::api::employee_admin::delete_employee,

        crate::api::profile::get_profile,
        crate::api::profile::update_profile,

        crate::api::education::list_education,
        crate::api::education::add_education,
        crate::api::education::update_education,
        crate::api::education::delete_education,

        crate::api::documents::list_documents,
        crate::api::documents::upload_document,
        crate::api::documents::delete_document,

        crate::api::leave::list_leave,
        crate::api::leave::submit_leave,

        crate::api::tasks::list_tasks,

        crate::api::attendance::get_attendance,
        crate::api::attendance::punch_attendance,

        crate::api::handbook::get_handbook,
        crate::api::handbook::upload_handbook,
        crate::api::handbook::delete_handbook
    ),
    components(
        schemas(
            Contact,
            TeamMember,
            Career,
            Product,
            Resource,
            EmployeeProfile,
            Attendance,
            LeaveRequest,
            EducationRecord,
            EducationEntry,
            EmployeeDocument,
            HandbookFile,
            Task
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Site", description = "Public site content APIs"),
        (name = "Auth", description = "Admin and employee sign-in APIs"),
        (name = "Employees", description = "Admin-side employee management APIs"),
        (name = "Employee Portal", description = "Self-service APIs for signed-in employees"),
        (name = "Handbook", description = "Company handbook APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "employee_id",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-Employee-ID"))),
            );
        }
    }
}
