use super::*;
use crate::http::MockHttpClient;
use crate::notify::{NoticeKind, RecordingNotifier};
use crate::resources::{CATEGORIES, PATIENTS, PRESCRIPTIONS, SLIDER_IMAGES};
use serde_json::json;

const BASE: &str = "http://127.0.0.1:8000";

// =========================================================
// 辅助函数
// =========================================================

fn setup(schema: &'static ResourceSchema) -> (MockHttpClient, CrudService<MockHttpClient>) {
    let mock = MockHttpClient::new();
    let api = ApiClient::new(BASE, mock.clone()).with_token(Some("tok".to_string()));
    (mock, CrudService::new(api, schema))
}

fn ready_model(schema: &'static ResourceSchema, items: Vec<Value>) -> ScreenModel {
    let mut model = ScreenModel::new(schema);
    model.finish_loading(Ok(items));
    model
}

fn ids(model: &ScreenModel) -> Vec<String> {
    model
        .items
        .iter()
        .filter_map(RecordId::of)
        .map(|id| id.to_string())
        .collect()
}

// =========================================================
// 加载
// =========================================================

#[tokio::test]
async fn test_search_filters_patients_by_query() {
    let (mock, service) = setup(&PATIENTS);
    mock.mock_response(
        HttpMethod::Get,
        "http://127.0.0.1:8000/core/patients/?search=Ali%20Khan",
        200,
        json!([{"id": 5, "name": "Ali Khan"}]),
    );

    let mut model = ScreenModel::new(&PATIENTS);
    model.finish_loading(service.search("Ali Khan").await);

    assert_eq!(ids(&model), vec!["5"]);
}

#[tokio::test]
async fn test_blank_search_loads_full_list() {
    let (mock, service) = setup(&PATIENTS);
    mock.mock_response(
        HttpMethod::Get,
        "http://127.0.0.1:8000/core/patients/",
        200,
        json!([{"id": 1}, {"id": 2}]),
    );

    let records = service.search("  ").await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(
        mock.last_request().unwrap().url,
        "http://127.0.0.1:8000/core/patients/"
    );
}

#[tokio::test]
async fn test_list_loads_into_ready_state() {
    let (mock, service) = setup(&CATEGORIES);
    mock.mock_response(
        HttpMethod::Get,
        "http://127.0.0.1:8000/core/category-types/",
        200,
        json!([{"id": 1, "name": "Surgery"}, {"id": 2, "name": "Dental"}]),
    );

    let mut model = ScreenModel::new(&CATEGORIES);
    assert_eq!(model.state, ScreenState::Loading);
    model.finish_loading(service.list().await);

    assert_eq!(model.state, ScreenState::Ready);
    assert_eq!(ids(&model), vec!["1", "2"]);
    assert_eq!(
        mock.last_request().unwrap().header("Authorization"),
        Some("Bearer tok")
    );
}

#[tokio::test]
async fn test_list_accepts_results_envelope() {
    let (mock, service) = setup(&CATEGORIES);
    mock.mock_response(
        HttpMethod::Get,
        "http://127.0.0.1:8000/core/category-types/",
        200,
        json!({"count": 1, "next": null, "previous": null, "results": [{"id": 9}]}),
    );

    let items = service.list().await.unwrap();
    assert_eq!(items, vec![json!({"id": 9})]);
}

#[tokio::test]
async fn test_failed_list_moves_to_error() {
    let (mock, service) = setup(&CATEGORIES);
    mock.mock_response(
        HttpMethod::Get,
        "http://127.0.0.1:8000/core/category-types/",
        403,
        json!({"detail": "You do not have permission to perform this action."}),
    );

    let mut model = ScreenModel::new(&CATEGORIES);
    model.finish_loading(service.list().await);

    assert_eq!(
        model.state,
        ScreenState::Error("You do not have permission to perform this action.".to_string())
    );
}

#[tokio::test]
async fn test_references_build_select_options() {
    let (mock, service) = setup(&PATIENTS);
    mock.mock_response(
        HttpMethod::Get,
        "http://127.0.0.1:8000/core/category-types/",
        200,
        json!([{"id": 3, "name": "Emergency"}]),
    );

    let refs = service.references().await.unwrap();
    assert_eq!(refs.label_for("categories", "3"), Some("Emergency"));
}

// =========================================================
// 提交
// =========================================================

#[tokio::test]
async fn test_create_appends_once_and_clears_draft() {
    let (mock, service) = setup(&CATEGORIES);
    mock.mock_response(
        HttpMethod::Post,
        "http://127.0.0.1:8000/core/category-types/",
        201,
        json!({"id": 3, "name": "Pediatrics"}),
    );
    let notifier = RecordingNotifier::new();
    let mut model = ready_model(&CATEGORIES, vec![json!({"id": 1, "name": "Surgery"})]);

    model.set_field("name", "Pediatrics");
    let submission = model.prepare_submit(&notifier).unwrap();
    assert_eq!(model.state, ScreenState::Submitting);
    assert_eq!(submission.target, SubmitTarget::Create);

    let result = service.submit(&submission).await;
    model.finish_submit(result, &notifier);

    assert_eq!(ids(&model), vec!["1", "3"]);
    assert!(model.draft.is_blank());
    assert_eq!(model.state, ScreenState::Ready);
    assert_eq!(notifier.kinds(), vec![NoticeKind::Success]);
    assert_eq!(
        mock.last_request().unwrap().json_body(),
        Some(json!({"name": "Pediatrics"}))
    );
}

#[test]
fn test_create_with_existing_id_does_not_duplicate() {
    let notifier = RecordingNotifier::new();
    let mut model = ready_model(&CATEGORIES, vec![json!({"id": 3, "name": "Old"})]);
    model.set_field("name", "New");
    model.prepare_submit(&notifier).unwrap();

    model.finish_submit(Ok(json!({"id": 3, "name": "New"})), &notifier);

    assert_eq!(ids(&model), vec!["3"]);
    assert_eq!(model.items[0]["name"], "New");
}

#[tokio::test]
async fn test_update_replaces_in_place() {
    let (mock, service) = setup(&PATIENTS);
    mock.mock_response(
        HttpMethod::Put,
        "http://127.0.0.1:8000/core/patients/2/update/",
        200,
        json!({"id": 2, "name": "Reza", "age": 41, "patient_type": "outpatient", "category": 1}),
    );
    let notifier = RecordingNotifier::new();
    let mut model = ready_model(
        &PATIENTS,
        vec![
            json!({"id": 1, "name": "Ali", "age": 30, "patient_type": "inpatient", "category": 1}),
            json!({"id": 2, "name": "Reza", "age": 40, "patient_type": "outpatient", "category": 1}),
            json!({"id": 3, "name": "Sara", "age": 22, "patient_type": "outpatient", "category": 2}),
        ],
    );

    let row = model.items[1].clone();
    model.begin_edit(&row);
    assert_eq!(model.mode(), FormMode::Update);
    assert_eq!(model.draft.get("age"), "40");
    model.set_field("age", "41");

    let submission = model.prepare_submit(&notifier).unwrap();
    model.finish_submit(service.submit(&submission).await, &notifier);

    assert_eq!(ids(&model), vec!["1", "2", "3"]);
    assert_eq!(model.items[1]["age"], 41);
    assert_eq!(model.editing, None);
    assert_eq!(
        mock.last_request().unwrap().json_body().unwrap()["age"],
        json!(41)
    );
}

#[test]
fn test_update_without_id_in_response_merges_sent_fields() {
    let notifier = RecordingNotifier::new();
    let mut model = ready_model(
        &CATEGORIES,
        vec![json!({"id": 1, "name": "A"}), json!({"id": 2, "name": "B"})],
    );
    let row = model.items[0].clone();
    model.begin_edit(&row);
    model.set_field("name", "A2");
    model.prepare_submit(&notifier).unwrap();

    model.finish_submit(Ok(Value::Null), &notifier);

    assert_eq!(model.items[0], json!({"id": 1, "name": "A2"}));
    assert_eq!(ids(&model), vec!["1", "2"]);
}

#[tokio::test]
async fn test_required_field_gate_blocks_request() {
    let (mock, _service) = setup(&PATIENTS);
    let notifier = RecordingNotifier::new();
    let mut model = ready_model(&PATIENTS, vec![]);
    model.set_field("name", "Ali");
    model.set_field("age", "   ");

    assert!(model.prepare_submit(&notifier).is_none());

    assert_eq!(mock.request_count(), 0);
    assert_eq!(model.state, ScreenState::Ready);
    let (kind, message) = notifier.last().unwrap();
    assert_eq!(kind, NoticeKind::Warning);
    assert!(message.contains("Age"));
    assert!(message.contains("Category"));
}

#[test]
fn test_double_submit_is_ignored() {
    let notifier = RecordingNotifier::new();
    let mut model = ready_model(&CATEGORIES, vec![]);
    model.set_field("name", "X");

    assert!(model.prepare_submit(&notifier).is_some());
    assert!(model.prepare_submit(&notifier).is_none());
}

#[tokio::test]
async fn test_failed_submit_keeps_draft() {
    let (mock, service) = setup(&CATEGORIES);
    mock.mock_response(
        HttpMethod::Post,
        "http://127.0.0.1:8000/core/category-types/",
        400,
        json!({"name": ["category type with this name already exists."]}),
    );
    let notifier = RecordingNotifier::new();
    let mut model = ready_model(&CATEGORIES, vec![]);
    model.set_field("name", "Surgery");

    let submission = model.prepare_submit(&notifier).unwrap();
    model.finish_submit(service.submit(&submission).await, &notifier);

    assert_eq!(model.draft.get("name"), "Surgery");
    assert!(model.items.is_empty());
    assert_eq!(model.state, ScreenState::Ready);
    let (kind, message) = notifier.last().unwrap();
    assert_eq!(kind, NoticeKind::Error);
    assert!(message.contains("already exists"));
}

#[tokio::test]
async fn test_multipart_resource_sends_form_parts() {
    let (mock, service) = setup(&SLIDER_IMAGES);
    mock.mock_response(
        HttpMethod::Post,
        "http://127.0.0.1:8000/common/upload-image/",
        201,
        json!({"id": 8, "images": "/media/slider/a.png"}),
    );
    let notifier = RecordingNotifier::new();
    let mut model = ready_model(&SLIDER_IMAGES, vec![]);
    model.draft.set_file(
        "image",
        Some(crate::http::FileBlob {
            filename: "a.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        }),
    );

    let submission = model.prepare_submit(&notifier).unwrap();
    assert!(matches!(submission.body, SubmissionBody::Multipart(ref p) if p.len() == 1 && p[0].name == "image"));
    model.finish_submit(service.submit(&submission).await, &notifier);

    assert_eq!(ids(&model), vec!["8"]);
    assert_eq!(mock.last_request().unwrap().header("Content-Type"), None);
}

// =========================================================
// 删除
// =========================================================

#[tokio::test]
async fn test_delete_removes_every_matching_row() {
    let (mock, service) = setup(&CATEGORIES);
    mock.mock_response(
        HttpMethod::Delete,
        "http://127.0.0.1:8000/core/category-types/2/",
        204,
        Value::Null,
    );
    let notifier = RecordingNotifier::new();
    let mut model = ready_model(
        &CATEGORIES,
        vec![json!({"id": 1}), json!({"id": 2}), json!({"id": "2"}), json!({"id": 3})],
    );

    let id = RecordId::from(2);
    model.finish_delete(&id, service.delete(&id).await, &notifier);

    assert_eq!(ids(&model), vec!["1", "3"]);
    assert_eq!(notifier.kinds(), vec![NoticeKind::Success]);
}

#[tokio::test]
async fn test_failed_delete_leaves_list_untouched() {
    let (_mock, service) = setup(&CATEGORIES);
    let notifier = RecordingNotifier::new();
    let mut model = ready_model(&CATEGORIES, vec![json!({"id": 1}), json!({"id": 2})]);

    let id = RecordId::from(2);
    model.finish_delete(&id, service.delete(&id).await, &notifier);

    assert_eq!(ids(&model), vec!["1", "2"]);
    assert_eq!(notifier.last().unwrap(), (NoticeKind::Error, "Not found.".to_string()));
}

// =========================================================
// 分页
// =========================================================

#[tokio::test]
async fn test_first_page_enables_next_only() {
    let (mock, service) = setup(&PRESCRIPTIONS);
    let results: Vec<Value> = (1..=20)
        .map(|i| json!({"id": i, "doctor_name": 1, "patient_name": 2, "copy": "x", "price": 100, "drugs": []}))
        .collect();
    mock.mock_response(
        HttpMethod::Get,
        "http://127.0.0.1:8000/core/pharmaceuticals/list/?page=1",
        200,
        json!({
            "count": 45,
            "next": "http://127.0.0.1:8000/core/pharmaceuticals/list/?page=2",
            "previous": null,
            "results": results
        }),
    );

    let mut model = ScreenModel::new(&PRESCRIPTIONS);
    model.finish_page(service.page(1).await, 1);

    let cursor = model.cursor.clone().unwrap();
    assert_eq!(model.items.len(), 20);
    assert!(cursor.has_next());
    assert!(!cursor.has_previous());
    assert_eq!(cursor.total_pages, 3);
    assert_eq!(
        cursor.next_page(),
        Some((
            "http://127.0.0.1:8000/core/pharmaceuticals/list/?page=2".to_string(),
            2
        ))
    );
}

#[tokio::test]
async fn test_following_absolute_link_uses_it_verbatim() {
    let (mock, service) = setup(&PRESCRIPTIONS);
    let next = "http://127.0.0.1:8000/core/pharmaceuticals/list/?page=2";
    mock.mock_response(
        HttpMethod::Get,
        next,
        200,
        json!({"count": 45, "next": null, "previous": "http://127.0.0.1:8000/core/pharmaceuticals/list/?page=1", "results": [{"id": 21}]}),
    );

    let mut model = ScreenModel::new(&PRESCRIPTIONS);
    model.finish_page(service.list_page(next).await, 2);

    let cursor = model.cursor.unwrap();
    assert!(!cursor.has_next());
    assert!(cursor.has_previous());
    assert_eq!(cursor.previous_page().map(|(_, n)| n), Some(1));
    assert_eq!(mock.last_request().unwrap().url, next);
}

#[test]
fn test_empty_page_has_single_page() {
    let page: Page<Record> = Page {
        count: 0,
        next: None,
        previous: None,
        results: vec![],
    };
    let cursor = PageCursor::from_page(&page, 1);
    assert_eq!(cursor.total_pages, 1);
    assert!(!cursor.has_next());
}

#[tokio::test]
async fn test_unpaginated_resource_rejects_page_request() {
    let (mock, service) = setup(&CATEGORIES);
    assert!(service.page(1).await.is_err());
    assert_eq!(mock.request_count(), 0);
}
