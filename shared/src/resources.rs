//! 各业务实体的资源描述

use crate::schema::{
    BodyEncoding, Capabilities, ColumnSpec, FieldKind, FieldSpec, OptionSource, ReferenceSpec,
    ResourceSchema,
};

// =========================================================
// 引用集合
// =========================================================

const CATEGORY_REF: ReferenceSpec = ReferenceSpec {
    key: "categories",
    path: "/core/category-types/",
    label_fields: &["name"],
};

const PATIENT_REF: ReferenceSpec = ReferenceSpec {
    key: "patients",
    path: "/core/patients/",
    label_fields: &["name"],
};

const DOCTOR_REF: ReferenceSpec = ReferenceSpec {
    key: "doctors",
    path: "/users/api/users/?role=doctor",
    label_fields: &["first_name", "last_name"],
};

const TEST_TYPE_REF: ReferenceSpec = ReferenceSpec {
    key: "test_types",
    path: "/core/test-type/",
    label_fields: &["name"],
};

const RECEPTION_CATEGORY_REF: ReferenceSpec = ReferenceSpec {
    key: "reception_categories",
    path: "/reception/categories/",
    label_fields: &["name"],
};

const BLOG_CATEGORY_REF: ReferenceSpec = ReferenceSpec {
    key: "blog_categories",
    path: "/reception/blog/categories/",
    label_fields: &["name"],
};

const DESIGN_CATEGORY_REF: ReferenceSpec = ReferenceSpec {
    key: "design_categories",
    path: "/group/categories/",
    label_fields: &["name"],
};

const ATTRIBUTE_CHOICE_REF: ReferenceSpec = ReferenceSpec {
    key: "attribute_choices",
    path: "/group/attribute-choices/",
    label_fields: &["name"],
};

const ATTRIBUTE_TYPE_REF: ReferenceSpec = ReferenceSpec {
    key: "attribute_types",
    path: "/group/attribute-types/",
    label_fields: &["name"],
};

// =========================================================
// 固定选项
// =========================================================

pub const USER_ROLES: &[(&str, &str)] = &[("1", "Designer"), ("2", "Reception"), ("0", "Admin")];

pub const STAFF_ROLES: &[(&str, &str)] = &[("1", "Doctor"), ("2", "Reception"), ("0", "Other")];

// =========================================================
// 核心业务
// =========================================================

pub static CATEGORIES: ResourceSchema = ResourceSchema {
    key: "categories",
    title: "Categories",
    list_path: "/core/category-types/",
    create_path: "/core/category-types/",
    update_path: "/core/category-types/{id}/",
    delete_path: "/core/category-types/{id}/",
    page_path: None,
    search_param: None,
    capabilities: Capabilities::ALL,
    encoding: BodyEncoding::Json,
    fields: &[FieldSpec::required("name", "Category Name", FieldKind::Text)],
    columns: &[ColumnSpec::field("ID", "id"), ColumnSpec::field("Name", "name")],
    references: &[],
};

pub static PATIENTS: ResourceSchema = ResourceSchema {
    key: "patients",
    title: "Patients",
    list_path: "/core/patients/",
    create_path: "/core/patients/",
    update_path: "/core/patients/{id}/update/",
    delete_path: "/core/patients/{id}/",
    page_path: None,
    search_param: Some("search"),
    capabilities: Capabilities::ALL,
    encoding: BodyEncoding::Json,
    fields: &[
        FieldSpec::required("name", "Name", FieldKind::Text),
        FieldSpec::required("age", "Age", FieldKind::Number),
        FieldSpec::required("patient_type", "Patient Type", FieldKind::Text),
        FieldSpec::required(
            "category",
            "Category",
            FieldKind::Select(OptionSource::Reference("categories")),
        ),
    ],
    columns: &[
        ColumnSpec::field("Name", "name"),
        ColumnSpec::field("Age", "age"),
        ColumnSpec::field("Type", "patient_type"),
        ColumnSpec::lookup("Category", "category", "categories"),
    ],
    references: &[CATEGORY_REF],
};

pub static STOCKS: ResourceSchema = ResourceSchema {
    key: "stocks",
    title: "Stocks",
    list_path: "/core/stocks/",
    create_path: "/core/stocks/",
    update_path: "/core/stocks/{id}/",
    delete_path: "/core/stocks/{id}/",
    page_path: None,
    search_param: None,
    capabilities: Capabilities::ALL,
    encoding: BodyEncoding::Json,
    fields: &[
        FieldSpec::required("name", "Name", FieldKind::Text),
        FieldSpec::required("price", "Price", FieldKind::Number),
        FieldSpec::required("percentage", "Percentage", FieldKind::Number),
        FieldSpec::required("amount", "Amount", FieldKind::Number),
        FieldSpec::optional("daily_used", "Daily Used", FieldKind::Number),
    ],
    columns: &[
        ColumnSpec::field("Name", "name"),
        ColumnSpec::field("Price", "price"),
        ColumnSpec::field("Percentage", "percentage"),
        ColumnSpec::field("Amount", "amount"),
        ColumnSpec::field("Daily Used", "daily_used"),
    ],
    references: &[],
};

/// 处方（唯一的分页列表）
pub static PRESCRIPTIONS: ResourceSchema = ResourceSchema {
    key: "prescriptions",
    title: "Prescriptions",
    list_path: "/core/pharmaceuticals/",
    create_path: "/core/pharmaceuticals/",
    update_path: "/core/pharmaceuticals/{id}/",
    delete_path: "/core/pharmaceuticals/{id}/",
    page_path: Some("/core/pharmaceuticals/list/?page={page}"),
    search_param: None,
    capabilities: Capabilities::ALL,
    encoding: BodyEncoding::Json,
    fields: &[
        FieldSpec::required(
            "doctor_name",
            "Doctor",
            FieldKind::Select(OptionSource::Reference("doctors")),
        ),
        FieldSpec::required(
            "patient_name",
            "Patient",
            FieldKind::Select(OptionSource::Reference("patients")),
        ),
        FieldSpec::required("copy", "Prescription", FieldKind::TextArea),
        FieldSpec::required("price", "Price", FieldKind::Number),
    ],
    columns: &[
        ColumnSpec::lookup("Doctor", "doctor_name", "doctors"),
        ColumnSpec::lookup("Patient", "patient_name", "patients"),
        ColumnSpec::drugs("Drugs", "drugs"),
        ColumnSpec::field("Prescription", "copy"),
        ColumnSpec::field("Price (AF)", "price"),
    ],
    references: &[DOCTOR_REF, PATIENT_REF],
};

pub static STAFF: ResourceSchema = ResourceSchema {
    key: "staff",
    title: "Staff",
    list_path: "/core/staff/",
    create_path: "/core/staff/",
    update_path: "/core/staff/{id}/",
    delete_path: "/core/staff/{id}/",
    page_path: None,
    search_param: None,
    capabilities: Capabilities::ALL,
    encoding: BodyEncoding::Json,
    fields: &[
        FieldSpec::required("first_name", "First Name", FieldKind::Text),
        FieldSpec::required("last_name", "Last Name", FieldKind::Text),
        FieldSpec::required("email", "Email", FieldKind::Email),
        FieldSpec::required("phone_number", "Phone Number", FieldKind::Text),
        FieldSpec::required(
            "role",
            "Role",
            FieldKind::Select(OptionSource::Static(STAFF_ROLES)),
        ),
        FieldSpec::required(
            "position",
            "Position",
            FieldKind::Select(OptionSource::Reference("categories")),
        ),
        FieldSpec::required("salary", "Salary", FieldKind::Number),
    ],
    columns: &[
        ColumnSpec::field("First Name", "first_name"),
        ColumnSpec::field("Last Name", "last_name"),
        ColumnSpec::field("Email", "email"),
        ColumnSpec::field("Phone", "phone_number"),
        ColumnSpec::choice("Role", "role", STAFF_ROLES),
        ColumnSpec::lookup("Position", "position", "categories"),
        ColumnSpec::field("Salary", "salary"),
    ],
    references: &[CATEGORY_REF],
};

pub static TAKEN_EXPENSES: ResourceSchema = ResourceSchema {
    key: "taken_expenses",
    title: "Taken Expenses",
    list_path: "/core/taken-expenses/",
    create_path: "/core/taken-expenses/",
    update_path: "/core/taken-expenses/{id}/",
    delete_path: "/core/taken-expenses/{id}/",
    page_path: None,
    search_param: None,
    capabilities: Capabilities::ALL,
    encoding: BodyEncoding::Json,
    fields: &[
        FieldSpec::required("name", "Name", FieldKind::Text),
        FieldSpec::optional("description", "Description", FieldKind::TextArea),
        FieldSpec::required("amount", "Amount", FieldKind::Number),
    ],
    columns: &[
        ColumnSpec::field("Name", "name"),
        ColumnSpec::field("Description", "description"),
        ColumnSpec::field("Amount", "amount"),
    ],
    references: &[],
};

pub static DAILY_PHARMACY_EXPENSES: ResourceSchema = ResourceSchema {
    key: "daily_pharmacy_expenses",
    title: "Daily Pharmacy Expenses",
    list_path: "/core/daily-expenses-pharmacy/",
    create_path: "/core/daily-expenses-pharmacy/",
    update_path: "/core/daily-expenses-pharmacy/{id}/",
    delete_path: "/core/daily-expenses-pharmacy/{id}/",
    page_path: None,
    search_param: None,
    capabilities: Capabilities::ALL,
    encoding: BodyEncoding::Json,
    fields: &[
        FieldSpec::required("name", "Name", FieldKind::Text),
        FieldSpec::required("amount", "Amount", FieldKind::Number),
        FieldSpec::optional("date", "Date", FieldKind::Date),
    ],
    columns: &[
        ColumnSpec::field("Name", "name"),
        ColumnSpec::field("Amount", "amount"),
        ColumnSpec::field("Date", "date"),
    ],
    references: &[],
};

pub static TEST_TYPES: ResourceSchema = ResourceSchema {
    key: "test_types",
    title: "Test Types",
    list_path: "/core/test-type/",
    create_path: "/core/test-type/",
    update_path: "/core/test-type/{id}/",
    delete_path: "/core/test-type/{id}/",
    page_path: None,
    search_param: None,
    capabilities: Capabilities::ALL,
    encoding: BodyEncoding::Json,
    fields: &[FieldSpec::required("name", "Test Name", FieldKind::Text)],
    columns: &[ColumnSpec::field("ID", "id"), ColumnSpec::field("Name", "name")],
    references: &[],
};

pub static LAB: ResourceSchema = ResourceSchema {
    key: "lab",
    title: "Laboratory",
    list_path: "/core/lab/",
    create_path: "/core/lab/",
    update_path: "/core/lab/{id}/",
    delete_path: "/core/lab/{id}/",
    page_path: None,
    search_param: None,
    capabilities: Capabilities::ALL,
    encoding: BodyEncoding::Json,
    fields: &[
        FieldSpec::required(
            "patient",
            "Patient",
            FieldKind::Select(OptionSource::Reference("patients")),
        ),
        FieldSpec::required(
            "test_type",
            "Test Type",
            FieldKind::Select(OptionSource::Reference("test_types")),
        ),
        FieldSpec::required("price", "Price", FieldKind::Number),
        FieldSpec::optional("refer_to", "Refer To", FieldKind::Text),
    ],
    columns: &[
        ColumnSpec::lookup("Patient", "patient", "patients"),
        ColumnSpec::lookup("Test", "test_type", "test_types"),
        ColumnSpec::field("Price", "price"),
        ColumnSpec::field("Refer To", "refer_to"),
    ],
    references: &[PATIENT_REF, TEST_TYPE_REF],
};

// =========================================================
// 用户
// =========================================================

/// 用户的更新和删除使用独立的路径
pub static USERS: ResourceSchema = ResourceSchema {
    key: "users",
    title: "Users",
    list_path: "/users/api/users/",
    create_path: "/users/create/",
    update_path: "/users/update/{id}/",
    delete_path: "/users/delete/{id}/",
    page_path: None,
    search_param: None,
    capabilities: Capabilities::ALL,
    encoding: BodyEncoding::Json,
    fields: &[
        FieldSpec::required("first_name", "First Name", FieldKind::Text),
        FieldSpec::required("last_name", "Last Name", FieldKind::Text),
        FieldSpec::required("email", "Email", FieldKind::Email),
        FieldSpec::optional("phone_number", "Phone Number", FieldKind::Text),
        FieldSpec::required(
            "role",
            "Role",
            FieldKind::Select(OptionSource::Static(USER_ROLES)),
        ),
        FieldSpec::on_create("password", "Password", FieldKind::Password),
        FieldSpec::on_create("password_confirm", "Confirm Password", FieldKind::Password),
    ],
    columns: &[
        ColumnSpec::field("First Name", "first_name"),
        ColumnSpec::field("Last Name", "last_name"),
        ColumnSpec::field("Email", "email"),
        ColumnSpec::field("Phone", "phone_number"),
        ColumnSpec::choice("Role", "role", USER_ROLES),
    ],
    references: &[],
};

// =========================================================
// 接待与网站
// =========================================================

pub static RECEPTIONS: ResourceSchema = ResourceSchema {
    key: "receptions",
    title: "Orders",
    list_path: "/reception/receptions/",
    create_path: "/reception/receptions/",
    update_path: "/reception/receptions/{id}/",
    delete_path: "/reception/receptions/{id}/",
    page_path: None,
    search_param: None,
    capabilities: Capabilities::ALL,
    encoding: BodyEncoding::Json,
    fields: &[
        FieldSpec::required("customer_name", "Customer Name", FieldKind::Text),
        FieldSpec::required("order_name", "Order Name", FieldKind::Text),
        FieldSpec::optional("description", "Description", FieldKind::TextArea),
        FieldSpec::required(
            "category_id",
            "Category",
            FieldKind::Select(OptionSource::Reference("reception_categories")),
        ),
    ],
    columns: &[
        ColumnSpec::field("Customer", "customer_name"),
        ColumnSpec::field("Order", "order_name"),
        ColumnSpec::field("Description", "description"),
        ColumnSpec::lookup("Category", "category_id", "reception_categories"),
    ],
    references: &[RECEPTION_CATEGORY_REF],
};

pub static RECEPTION_CATEGORIES: ResourceSchema = ResourceSchema {
    key: "reception_categories",
    title: "Order Categories",
    list_path: "/reception/categories/",
    create_path: "/reception/categories/",
    update_path: "/reception/categories/{id}/",
    delete_path: "/reception/categories/{id}/",
    page_path: None,
    search_param: None,
    capabilities: Capabilities::ALL,
    encoding: BodyEncoding::Json,
    fields: &[FieldSpec::required("name", "Category Name", FieldKind::Text)],
    columns: &[ColumnSpec::field("Name", "name")],
    references: &[],
};

pub static BLOG_CATEGORIES: ResourceSchema = ResourceSchema {
    key: "blog_categories",
    title: "Blog Categories",
    list_path: "/reception/blog/categories/",
    create_path: "/reception/blog/categories/",
    update_path: "/reception/blog/categories/{id}/",
    delete_path: "/reception/blog/categories/{id}/",
    page_path: None,
    search_param: None,
    capabilities: Capabilities::ALL,
    encoding: BodyEncoding::Json,
    fields: &[FieldSpec::required("name", "Category Name", FieldKind::Text)],
    columns: &[ColumnSpec::field("Name", "name")],
    references: &[],
};

pub static BLOG_POSTS: ResourceSchema = ResourceSchema {
    key: "blog_posts",
    title: "Blog Posts",
    list_path: "/reception/blog/blog-posts/",
    create_path: "/reception/blog/blog-posts/",
    update_path: "/reception/blog/blog-posts/{id}/",
    delete_path: "/reception/blog/blog-posts/{id}/",
    page_path: None,
    search_param: None,
    capabilities: Capabilities::ALL,
    encoding: BodyEncoding::Multipart,
    fields: &[
        FieldSpec::required("title", "Title", FieldKind::Text),
        FieldSpec::required("description", "Description", FieldKind::TextArea),
        FieldSpec::optional("image", "Image", FieldKind::File),
        FieldSpec::required(
            "category",
            "Category",
            FieldKind::Select(OptionSource::Reference("blog_categories")),
        ),
    ],
    columns: &[
        ColumnSpec::image("Image", "image"),
        ColumnSpec::field("Title", "title"),
        ColumnSpec::field("Description", "description"),
        ColumnSpec::lookup("Category", "category", "blog_categories"),
    ],
    references: &[BLOG_CATEGORY_REF],
};

pub static SLIDER_IMAGES: ResourceSchema = ResourceSchema {
    key: "slider",
    title: "Slider Images",
    list_path: "/common/upload-image/",
    create_path: "/common/upload-image/",
    update_path: "/common/upload-image/{id}/",
    delete_path: "/common/upload-image/{id}/",
    page_path: None,
    search_param: None,
    capabilities: Capabilities::ALL,
    encoding: BodyEncoding::Multipart,
    fields: &[FieldSpec::required("image", "Image", FieldKind::File)],
    columns: &[ColumnSpec::field("ID", "id"), ColumnSpec::image("Image", "images")],
    references: &[],
};

/// 网站首页的服务介绍；更新和删除带动作后缀
pub static SERVICES: ResourceSchema = ResourceSchema {
    key: "services",
    title: "Services",
    list_path: "/common/services/",
    create_path: "/common/services/",
    update_path: "/common/services/{id}/update/",
    delete_path: "/common/services/{id}/delete/",
    page_path: None,
    search_param: None,
    capabilities: Capabilities::ALL,
    encoding: BodyEncoding::Multipart,
    fields: &[
        FieldSpec::required("title", "Title", FieldKind::Text),
        FieldSpec::required("description", "Description", FieldKind::TextArea),
        FieldSpec::optional("image", "Image", FieldKind::File),
    ],
    columns: &[
        ColumnSpec::image("Image", "image"),
        ColumnSpec::field("Title", "title"),
        ColumnSpec::field("Description", "description"),
    ],
    references: &[],
};

// =========================================================
// 设计
// =========================================================

pub static DESIGN_CATEGORIES: ResourceSchema = ResourceSchema {
    key: "design_categories",
    title: "Design Categories",
    list_path: "/group/categories/",
    create_path: "/group/categories/",
    update_path: "/group/categories/{id}/",
    delete_path: "/group/categories/{id}/",
    page_path: None,
    search_param: None,
    capabilities: Capabilities::ALL,
    encoding: BodyEncoding::Json,
    fields: &[FieldSpec::required("name", "Category Name", FieldKind::Text)],
    columns: &[ColumnSpec::field("ID", "id"), ColumnSpec::field("Name", "name")],
    references: &[],
};

pub static ATTRIBUTE_CHOICES: ResourceSchema = ResourceSchema {
    key: "attribute_choices",
    title: "Attribute Choices",
    list_path: "/group/attribute-choices/",
    create_path: "/group/attribute-choices/",
    update_path: "/group/attribute-choices/{id}/",
    delete_path: "/group/attribute-choices/{id}/",
    page_path: None,
    search_param: None,
    capabilities: Capabilities::ALL,
    encoding: BodyEncoding::Json,
    fields: &[FieldSpec::required("name", "Choice", FieldKind::Text)],
    columns: &[ColumnSpec::field("Name", "name")],
    references: &[],
};

pub static ATTRIBUTE_TYPES: ResourceSchema = ResourceSchema {
    key: "attribute_types",
    title: "Attributes",
    list_path: "/group/attribute-types/",
    create_path: "/group/attribute-types/",
    update_path: "/group/attribute-types/{id}/",
    delete_path: "/group/attribute-types/{id}/",
    page_path: None,
    search_param: None,
    capabilities: Capabilities::ALL,
    encoding: BodyEncoding::Json,
    fields: &[
        FieldSpec::required(
            "category",
            "Category",
            FieldKind::Select(OptionSource::Reference("design_categories")),
        ),
        FieldSpec::required("name", "Attribute", FieldKind::Text),
        FieldSpec::optional(
            "attribute_type",
            "Type",
            FieldKind::Select(OptionSource::Reference("attribute_choices")),
        ),
    ],
    columns: &[
        ColumnSpec::field("Attribute", "name"),
        ColumnSpec::lookup("Category", "category", "design_categories"),
        ColumnSpec::lookup("Type", "attribute_type", "attribute_choices"),
    ],
    references: &[DESIGN_CATEGORY_REF, ATTRIBUTE_CHOICE_REF],
};

/// 属性值的 `attribute` 以嵌套对象返回，后端不接受写入，只能浏览和删除
pub static ATTRIBUTE_VALUES: ResourceSchema = ResourceSchema {
    key: "attribute_values",
    title: "Attribute Values",
    list_path: "/group/attribute-values/",
    create_path: "/group/attribute-values/",
    update_path: "/group/attribute-values/{id}/",
    delete_path: "/group/attribute-values/{id}/",
    page_path: None,
    search_param: None,
    capabilities: Capabilities::DELETE_ONLY,
    encoding: BodyEncoding::Json,
    fields: &[],
    columns: &[
        ColumnSpec::field("Value", "attribute_value"),
        ColumnSpec::lookup("Attribute", "attribute", "attribute_types"),
        ColumnSpec::lookup("Type", "type", "attribute_choices"),
    ],
    references: &[ATTRIBUTE_TYPE_REF, ATTRIBUTE_CHOICE_REF],
};

// =========================================================
// 只读列表
// =========================================================

/// 普通员工（系统用户）的只读列表
pub static REGULAR_STAFF: ResourceSchema = ResourceSchema {
    key: "regular_staff",
    title: "Regular Staff",
    list_path: "/users/api/users/",
    create_path: "/users/create/",
    update_path: "/users/update/{id}/",
    delete_path: "/users/delete/{id}/",
    page_path: None,
    search_param: None,
    capabilities: Capabilities::READ_ONLY,
    encoding: BodyEncoding::Json,
    fields: &[],
    columns: &[
        ColumnSpec::field("First Name", "first_name"),
        ColumnSpec::field("Last Name", "last_name"),
        ColumnSpec::field("Email", "email"),
        ColumnSpec::field("Role", "role_display"),
        ColumnSpec::field("Phone", "phone_number"),
    ],
    references: &[],
};

/// 全部资源
pub static ALL: [&ResourceSchema; 21] = [
    &CATEGORIES,
    &PATIENTS,
    &STOCKS,
    &PRESCRIPTIONS,
    &STAFF,
    &TAKEN_EXPENSES,
    &DAILY_PHARMACY_EXPENSES,
    &TEST_TYPES,
    &LAB,
    &USERS,
    &RECEPTIONS,
    &RECEPTION_CATEGORIES,
    &BLOG_CATEGORIES,
    &BLOG_POSTS,
    &SLIDER_IMAGES,
    &SERVICES,
    &DESIGN_CATEGORIES,
    &ATTRIBUTE_CHOICES,
    &ATTRIBUTE_TYPES,
    &ATTRIBUTE_VALUES,
    &REGULAR_STAFF,
];

pub fn by_key(key: &str) -> Option<&'static ResourceSchema> {
    ALL.iter().copied().find(|s| s.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKind, OptionSource, RecordId};
    use std::collections::HashSet;

    #[test]
    fn test_keys_are_unique() {
        let keys: HashSet<&str> = ALL.iter().map(|s| s.key).collect();
        assert_eq!(keys.len(), ALL.len());
    }

    #[test]
    fn test_select_references_are_declared() {
        for schema in ALL.iter() {
            for field in schema.fields {
                if let FieldKind::Select(OptionSource::Reference(key)) = field.kind {
                    assert!(
                        schema.reference(key).is_some(),
                        "{} field {} references undeclared {}",
                        schema.key,
                        field.name,
                        key
                    );
                }
            }
        }
    }

    #[test]
    fn test_templates_carry_id_placeholder() {
        for schema in ALL.iter() {
            assert!(schema.update_path.contains("{id}"), "{}", schema.key);
            assert!(schema.delete_path.contains("{id}"), "{}", schema.key);
        }
    }

    #[test]
    fn test_user_paths_differ_per_operation() {
        let id = RecordId::from(5);
        assert_eq!(USERS.create_path, "/users/create/");
        assert_eq!(USERS.update_path(&id), "/users/update/5/");
        assert_eq!(USERS.delete_path(&id), "/users/delete/5/");
    }

    #[test]
    fn test_only_prescriptions_paginate() {
        let paginated: Vec<&str> = ALL.iter().filter(|s| s.is_paginated()).map(|s| s.key).collect();
        assert_eq!(paginated, vec!["prescriptions"]);
        assert_eq!(
            PRESCRIPTIONS.page_path(1).as_deref(),
            Some("/core/pharmaceuticals/list/?page=1")
        );
    }

    #[test]
    fn test_only_patients_are_searchable() {
        let searchable: Vec<&str> = ALL.iter().filter(|s| s.is_searchable()).map(|s| s.key).collect();
        assert_eq!(searchable, vec!["patients"]);
        assert_eq!(
            PATIENTS.search_path("ali").as_deref(),
            Some("/core/patients/?search=ali")
        );
    }

    #[test]
    fn test_service_paths_carry_action_suffix() {
        let id = RecordId::from(4);
        assert_eq!(SERVICES.update_path(&id), "/common/services/4/update/");
        assert_eq!(SERVICES.delete_path(&id), "/common/services/4/delete/");
        assert_eq!(SERVICES.encoding, BodyEncoding::Multipart);
    }

    #[test]
    fn test_slider_uploads_image_and_displays_images() {
        assert!(SLIDER_IMAGES.field("image").is_some_and(|f| f.is_file()));
        assert!(SLIDER_IMAGES.field("images").is_none());
        assert_eq!(SLIDER_IMAGES.columns[1].value, crate::schema::ColumnValue::Image("images"));
    }

    #[test]
    fn test_read_only_lists_have_no_form() {
        for schema in [&REGULAR_STAFF, &ATTRIBUTE_VALUES] {
            assert!(!schema.capabilities.create, "{}", schema.key);
            assert!(!schema.capabilities.update, "{}", schema.key);
            assert!(schema.fields.is_empty(), "{}", schema.key);
        }
        assert!(ATTRIBUTE_VALUES.capabilities.delete);
        assert!(!REGULAR_STAFF.capabilities.delete);
    }

    #[test]
    fn test_lookup_by_key() {
        assert!(std::ptr::eq(by_key("lab").unwrap(), &LAB));
        assert!(by_key("unknown").is_none());
    }
}
