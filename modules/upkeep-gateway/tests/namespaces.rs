//! Domain-specific calls beyond plain CRUD.

mod common;

use httpmock::prelude::*;
use serde_json::json;
use upkeep_gateway::ListQuery;

use common::client_for;

#[tokio::test]
async fn asset_and_work_order_stats() {
    let server = MockServer::start();
    let assets = server.mock(|when, then| {
        when.method(GET).path("/api/assets/stats");
        then.status(200).json_body(json!({"total": 12, "by_status": {"active": 10}}));
    });
    let orders = server.mock(|when, then| {
        when.method(GET).path("/api/work-orders/stats");
        then.status(200).json_body(json!({"open": 3}));
    });

    let client = client_for(&server);
    let asset_stats = client.assets().stats().await.unwrap();
    let order_stats = client.work_orders().stats().await.unwrap();

    assert_eq!(asset_stats.get("total"), Some(&json!(12)));
    assert_eq!(order_stats.get("open"), Some(&json!(3)));
    assert_eq!(assets.calls(), 1);
    assert_eq!(orders.calls(), 1);
}

#[tokio::test]
async fn stats_failure_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/work-orders/stats");
        then.status(401);
    });

    let client = client_for(&server);
    let err = client.work_orders().stats().await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch work order stats");
    assert_eq!(err.resource(), Some("work-orders"));
}

#[tokio::test]
async fn complete_and_assign_work_order() {
    let server = MockServer::start();
    let complete = server.mock(|when, then| {
        when.method(POST)
            .path("/api/work-orders/wo1/complete")
            .json_body(json!({"notes": "replaced seal"}));
        then.status(200).json_body(json!({"id": "wo1", "status": "completed"}));
    });
    let assign = server.mock(|when, then| {
        when.method(PATCH)
            .path("/api/work-orders/wo1/assign")
            .json_body(json!({"assigned_to": "p7"}));
        then.status(200).json_body(json!({"id": "wo1", "assigned_to": "p7"}));
    });

    let client = client_for(&server);
    let done = client
        .work_orders()
        .complete("wo1", &json!({"notes": "replaced seal"}))
        .await
        .unwrap();
    let assigned = client
        .work_orders()
        .assign("wo1", &json!({"assigned_to": "p7"}))
        .await
        .unwrap();

    assert_eq!(done.status.as_deref(), Some("completed"));
    assert_eq!(assigned.assigned_to.as_deref(), Some("p7"));
    assert_eq!(complete.calls(), 1);
    assert_eq!(assign.calls(), 1);
}

#[tokio::test]
async fn adjust_stock_posts_to_adjust() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/inventory/i1/adjust")
            .json_body(json!({"delta": -2}));
        then.status(200).json_body(json!({"id": "i1", "quantity": 8}));
    });

    let client = client_for(&server);
    let item = client
        .inventory()
        .adjust_stock("i1", &json!({"delta": -2}))
        .await
        .unwrap();

    assert_eq!(item.quantity, Some(8.0));
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn adjust_stock_failure_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/inventory/i1/adjust");
        then.status(422).body(r#"{"error":"insufficient stock"}"#);
    });

    let client = client_for(&server);
    let err = client
        .inventory()
        .adjust_stock("i1", &json!({"delta": -100}))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to adjust stock");
    assert_eq!(err.status(), Some(http::StatusCode::UNPROCESSABLE_ENTITY));
}

#[tokio::test]
async fn safety_collections() {
    let server = MockServer::start();
    let capa = server.mock(|when, then| {
        when.method(POST)
            .path("/api/safety/capa")
            .json_body(json!({"title": "Guard rail"}));
        then.status(201).json_body(json!({"id": "c1", "title": "Guard rail"}));
    });
    let precautions = server.mock(|when, then| {
        when.method(GET).path("/api/safety/precautions");
        then.status(200).json_body(json!([{"id": "pr1", "category": "PPE"}]));
    });

    let client = client_for(&server);
    let action = client
        .safety()
        .capa()
        .create(&json!({"title": "Guard rail"}))
        .await
        .unwrap();
    let listed = client
        .safety()
        .precautions()
        .list(&ListQuery::new())
        .await
        .unwrap();

    assert_eq!(action.id, "c1");
    assert_eq!(listed[0].category.as_deref(), Some("PPE"));
    assert_eq!(capa.calls(), 1);
    assert_eq!(precautions.calls(), 1);
}

#[tokio::test]
async fn job_plan_children_are_nested() {
    let server = MockServer::start();
    let tools = server.mock(|when, then| {
        when.method(POST)
            .path("/api/job-plans/jp1/tools")
            .json_body(json!({"name": "Torque wrench"}));
        then.status(201).json_body(json!({"id": "t1", "name": "Torque wrench"}));
    });
    let delete_task = server.mock(|when, then| {
        when.method(DELETE).path("/api/job-plans/jp1/tasks/k2");
        then.status(200).json_body(json!({"deleted": true}));
    });

    let client = client_for(&server);
    let plans = client.job_plans();
    let tool = plans
        .tools("jp1")
        .create(&json!({"name": "Torque wrench"}))
        .await
        .unwrap();
    let deleted = plans.tasks("jp1").delete("k2").await.unwrap();

    assert_eq!(tool.name.as_deref(), Some("Torque wrench"));
    assert_eq!(deleted, json!({"deleted": true}));
    assert_eq!(tools.calls(), 1);
    assert_eq!(delete_task.calls(), 1);
}

#[tokio::test]
async fn pm_schedule_assignments_and_history() {
    let server = MockServer::start();
    let replace = server.mock(|when, then| {
        when.method(PUT)
            .path("/api/pm-schedules/pm1/assignments")
            .json_body(json!([{"person_id": "p1"}, {"person_id": "p2"}]));
        then.status(200)
            .json_body(json!([{"id": "x1", "person_id": "p1"}, {"id": "x2", "person_id": "p2"}]));
    });
    let history = server.mock(|when, then| {
        when.method(GET)
            .path("/api/pm-schedules/pm1/history")
            .query_param("limit", "5");
        then.status(200)
            .json_body(json!({"history": [{"id": "h1", "status": "done"}]}));
    });
    let record = server.mock(|when, then| {
        when.method(POST)
            .path("/api/pm-schedules/pm1/history")
            .json_body(json!({"status": "done"}));
        then.status(201).json_body(json!({"id": "h2", "status": "done"}));
    });
    let materials = server.mock(|when, then| {
        when.method(GET).path("/api/pm-schedules/pm1/materials");
        then.status(200).json_body(json!([{"id": "m1", "quantity": 2}]));
    });

    let client = client_for(&server);
    let schedules = client.pm_schedules();

    let assigned = schedules
        .replace_assignments("pm1", &json!([{"person_id": "p1"}, {"person_id": "p2"}]))
        .await
        .unwrap();
    let entries = schedules
        .history("pm1", &ListQuery::new().limit(5))
        .await
        .unwrap();
    let recorded = schedules
        .record_history("pm1", &json!({"status": "done"}))
        .await
        .unwrap();
    let parts = schedules
        .materials("pm1")
        .list(&ListQuery::new())
        .await
        .unwrap();

    assert_eq!(assigned.len(), 2);
    assert_eq!(entries[0].id, "h1");
    assert_eq!(recorded.id, "h2");
    assert_eq!(parts[0].quantity, Some(2.0));
    assert_eq!(replace.calls(), 1);
    assert_eq!(history.calls(), 1);
    assert_eq!(record.calls(), 1);
    assert_eq!(materials.calls(), 1);
}

#[tokio::test]
async fn pm_history_failure_messages() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.path("/api/pm-schedules/pm1/history");
        then.status(400);
    });

    let client = client_for(&server);
    let fetch = client
        .pm_schedules()
        .history("pm1", &ListQuery::new())
        .await
        .unwrap_err();
    let record = client
        .pm_schedules()
        .record_history("pm1", &json!({}))
        .await
        .unwrap_err();

    assert_eq!(fetch.to_string(), "Failed to fetch PM history");
    assert_eq!(record.to_string(), "Failed to record PM history");
}

#[tokio::test]
async fn meters_unwrap_their_envelopes() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/meters");
        then.status(200)
            .json_body(json!({"meters": [{"id": "m1", "unit": "h"}], "total": 1}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/meters/m1");
        then.status(200)
            .json_body(json!({"meter": {"id": "m1", "current_reading": 1520.5}}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/meters/groups");
        then.status(200).json_body(json!({"groups": [{"id": "g1"}]}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/meters/assignments");
        then.status(200).json_body(json!([{"id": "ma1", "asset_id": "a1"}]));
    });

    let client = client_for(&server);
    let meters = client.meters();

    let listed = meters.list(&ListQuery::new()).await.unwrap();
    let one = meters.get("m1").await.unwrap();
    let groups = meters.groups().list(&ListQuery::new()).await.unwrap();
    let links = meters.assignments().list(&ListQuery::new()).await.unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].unit.as_deref(), Some("h"));
    assert_eq!(one.current_reading, Some(1520.5));
    assert_eq!(groups[0].id, "g1");
    assert_eq!(links[0].asset_id.as_deref(), Some("a1"));
}

#[tokio::test]
async fn record_meter_reading() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/meters/m1/readings")
            .json_body(json!({"value": 1530}));
        then.status(201)
            .json_body(json!({"reading": {"id": "r9", "meter_id": "m1", "value": 1530}}));
    });

    let client = client_for(&server);
    let reading = client
        .meters()
        .record_reading("m1", &json!({"value": 1530}))
        .await
        .unwrap();

    assert_eq!(reading.id.as_deref(), Some("r9"));
    assert_eq!(reading.value, Some(1530.0));
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn route_stops() {
    let server = MockServer::start();
    let replace = server.mock(|when, then| {
        when.method(PUT)
            .path("/api/routes/r1/assets")
            .json_body(json!([{"asset_id": "a2"}, {"asset_id": "a1"}]));
        then.status(200).json_body(json!([
            {"id": "s1", "asset_id": "a2", "sequence": 1},
            {"id": "s2", "asset_id": "a1", "sequence": 2}
        ]));
    });
    let pm = server.mock(|when, then| {
        when.method(GET).path("/api/routes/r1/pm-assignments");
        then.status(200).json_body(json!([{"id": "rp1", "pm_schedule_id": "pm1"}]));
    });

    let client = client_for(&server);
    let stops = client
        .routes()
        .replace_assets("r1", &json!([{"asset_id": "a2"}, {"asset_id": "a1"}]))
        .await
        .unwrap();
    let linked = client
        .routes()
        .pm_assignments("r1")
        .list(&ListQuery::new())
        .await
        .unwrap();

    assert_eq!(stops[0].sequence, Some(1));
    assert_eq!(linked[0].pm_schedule_id.as_deref(), Some("pm1"));
    assert_eq!(replace.calls(), 1);
    assert_eq!(pm.calls(), 1);
}

#[tokio::test]
async fn replace_failure_names_the_collection() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PUT).path("/api/routes/r1/assets");
        then.status(409);
    });

    let client = client_for(&server);
    let err = client
        .routes()
        .replace_assets("r1", &json!([]))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to replace route assets");
    assert_eq!(err.resource(), Some("routes/r1/assets"));
}

#[tokio::test]
async fn workflow_templates_and_steps() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/workflow/templates");
        then.status(200)
            .json_body(json!([{"id": "wt1", "entity_type": "work_order"}]));
    });
    let steps = server.mock(|when, then| {
        when.method(GET).path("/api/workflow/templates/wt1/steps");
        then.status(200).json_body(json!([
            {"id": "s1", "name": "open", "transitions": ["s2"]},
            {"id": "s2", "name": "closed"}
        ]));
    });

    let client = client_for(&server);
    let templates = client
        .workflow()
        .templates()
        .list(&ListQuery::new())
        .await
        .unwrap();
    let listed = client
        .workflow()
        .steps("wt1")
        .list(&ListQuery::new())
        .await
        .unwrap();

    assert_eq!(templates[0].entity_type.as_deref(), Some("work_order"));
    assert_eq!(listed[0].transitions, Some(vec!["s2".to_owned()]));
    assert_eq!(steps.calls(), 1);
}

#[tokio::test]
async fn workflow_state_and_transition() {
    let server = MockServer::start();
    let state = server.mock(|when, then| {
        when.method(GET).path("/api/workflow/state/work_order/wo1");
        then.status(200)
            .json_body(json!({"entity_type": "work_order", "entity_id": "wo1", "current_step": "open"}));
    });
    let transition = server.mock(|when, then| {
        when.method(POST)
            .path("/api/workflow/state/work_order/wo1/transition")
            .json_body(json!({"to": "closed"}));
        then.status(200).json_body(json!({"current_step": "closed"}));
    });

    let client = client_for(&server);
    let workflow = client.workflow();
    let current = workflow.state("work_order", "wo1").await.unwrap();
    let moved = workflow
        .transition("work_order", "wo1", &json!({"to": "closed"}))
        .await
        .unwrap();

    assert_eq!(current.current_step.as_deref(), Some("open"));
    assert_eq!(moved.current_step.as_deref(), Some("closed"));
    assert_eq!(state.calls(), 1);
    assert_eq!(transition.calls(), 1);
}

#[tokio::test]
async fn rejected_transition_reports_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/workflow/state/work_order/wo1/transition");
        then.status(409).body(r#"{"error":"not allowed from closed"}"#);
    });

    let client = client_for(&server);
    let err = client
        .workflow()
        .transition("work_order", "wo1", &json!({"to": "open"}))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to transition workflow state");
    assert_eq!(err.resource(), Some("workflow/state"));
    assert_eq!(err.status(), Some(http::StatusCode::CONFLICT));
}

#[tokio::test]
async fn workflow_analytics_and_bulk() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/workflow/analytics")
            .query_param("entity_type", "work_order");
        then.status(200).json_body(json!({"avg_cycle_hours": 31.5}));
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/workflow/bulk")
            .json_body(json!({"ids": ["wo1", "wo2"], "to": "closed"}));
        then.status(200)
            .json_body(json!({"succeeded": ["wo1"], "failed": [{"id": "wo2"}]}));
    });

    let client = client_for(&server);
    let analytics = client
        .workflow()
        .analytics(&ListQuery::new().param("entity_type", "work_order"))
        .await
        .unwrap();
    let result = client
        .workflow()
        .bulk_transition(&json!({"ids": ["wo1", "wo2"], "to": "closed"}))
        .await
        .unwrap();

    assert_eq!(analytics.0, json!({"avg_cycle_hours": 31.5}));
    assert_eq!(result.succeeded, Some(vec![json!("wo1")]));
    assert_eq!(result.failed.map(|f| f.len()), Some(1));
}
