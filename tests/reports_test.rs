mod tools;

use chrono::{Days, NaiveDate, NaiveTime, Utc};

use rota::application::dto::{DashboardSummary, ReportFilters};
use rota::domain::auth_model::Caller;
use rota::domain::schedule_model::{AssignmentStatus, ScheduleInput};

fn input(
    date: &str,
    time: (u32, u32),
    service_type: &str,
    ministry_id: i64,
    volunteer_ids: Vec<i64>,
) -> ScheduleInput {
    ScheduleInput {
        date: date.parse().unwrap(),
        time: NaiveTime::from_hms_opt(time.0, time.1, 0).unwrap(),
        service_type: service_type.to_string(),
        ministry_id,
        notes: None,
        volunteer_ids,
    }
}

#[tokio::test]
async fn test_flattened_view_filters_by_status_and_ministry() {
    let (pool, services) = tools::setup_test_services().await;
    let coordinator = Caller::coordinator(1);

    let worship = tools::seed_ministry(&pool, "Worship").await;
    let kids = tools::seed_ministry(&pool, "Kids").await;
    let u1 = tools::seed_volunteer(&pool, "Ana").await;
    let u2 = tools::seed_volunteer(&pool, "Bruno").await;

    let worship_schedule = services
        .scheduling
        .create(&coordinator, &input("2024-06-01", (9, 0), "Worship", worship, vec![u1, u2]))
        .await
        .unwrap();
    services
        .scheduling
        .create(&coordinator, &input("2024-06-02", (10, 0), "Kids Club", kids, vec![u1]))
        .await
        .unwrap();

    // Ana confirms on the worship schedule; Bruno stays pending.
    let ana_assignment = worship_schedule
        .volunteers
        .iter()
        .find(|v| v.user_id == u1)
        .unwrap()
        .assignment_id;
    services
        .scheduling
        .confirm(&Caller::volunteer(u1), ana_assignment)
        .await
        .unwrap();

    let filters = ReportFilters {
        status: Some(AssignmentStatus::Pending),
        ministry_id: Some(worship),
        ..Default::default()
    };
    let rows = services
        .reports
        .list_flattened(&coordinator, &filters)
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].volunteer, "Bruno");
    assert_eq!(rows[0].ministry, "Worship");
    assert_eq!(rows[0].status, AssignmentStatus::Pending);
}

#[tokio::test]
async fn test_flattened_view_search_matches_name_or_type() {
    let (pool, services) = tools::setup_test_services().await;
    let coordinator = Caller::coordinator(1);

    let worship = tools::seed_ministry(&pool, "Worship").await;
    let u1 = tools::seed_volunteer(&pool, "Ana Souza").await;
    let u2 = tools::seed_volunteer(&pool, "Bruno Lima").await;

    services
        .scheduling
        .create(&coordinator, &input("2024-06-01", (9, 0), "Worship", worship, vec![u1]))
        .await
        .unwrap();
    services
        .scheduling
        .create(&coordinator, &input("2024-06-02", (10, 0), "Prayer Night", worship, vec![u2]))
        .await
        .unwrap();

    // Substring of a volunteer name, case-insensitive.
    let by_name = services
        .reports
        .list_flattened(
            &coordinator,
            &ReportFilters {
                search: Some("souza".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].volunteer, "Ana Souza");

    // Substring of a schedule type.
    let by_type = services
        .reports
        .list_flattened(
            &coordinator,
            &ReportFilters {
                search: Some("prayer".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_type.len(), 1);
    assert_eq!(by_type[0].volunteer, "Bruno Lima");
}

#[tokio::test]
async fn test_flattened_view_ordering_and_read_idempotence() {
    let (pool, services) = tools::setup_test_services().await;
    let coordinator = Caller::coordinator(1);

    let worship = tools::seed_ministry(&pool, "Worship").await;
    let u_b = tools::seed_volunteer(&pool, "Bruno").await;
    let u_a = tools::seed_volunteer(&pool, "Ana").await;

    services
        .scheduling
        .create(&coordinator, &input("2024-06-08", (9, 0), "Worship", worship, vec![u_a, u_b]))
        .await
        .unwrap();
    services
        .scheduling
        .create(&coordinator, &input("2024-06-01", (9, 0), "Worship", worship, vec![u_b]))
        .await
        .unwrap();
    services
        .scheduling
        .create(&coordinator, &input("2024-06-08", (8, 0), "Worship", worship, vec![u_a]))
        .await
        .unwrap();

    let rows = services
        .reports
        .list_flattened(&coordinator, &ReportFilters::default())
        .await
        .unwrap();

    let keys: Vec<(NaiveDate, NaiveTime, &str)> = rows
        .iter()
        .map(|r| (r.date, r.time, r.volunteer.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("2024-06-08".parse().unwrap(), NaiveTime::from_hms_opt(8, 0, 0).unwrap(), "Ana"),
            ("2024-06-08".parse().unwrap(), NaiveTime::from_hms_opt(9, 0, 0).unwrap(), "Ana"),
            ("2024-06-08".parse().unwrap(), NaiveTime::from_hms_opt(9, 0, 0).unwrap(), "Bruno"),
            ("2024-06-01".parse().unwrap(), NaiveTime::from_hms_opt(9, 0, 0).unwrap(), "Bruno"),
        ]
    );

    // No intervening write, identical result.
    let again = services
        .reports
        .list_flattened(&coordinator, &ReportFilters::default())
        .await
        .unwrap();
    assert_eq!(rows, again);
}

#[tokio::test]
async fn test_coordinator_summary_counts() {
    let (pool, services) = tools::setup_test_services().await;
    let coordinator = Caller::coordinator(1);

    let worship = tools::seed_ministry(&pool, "Worship").await;
    let u1 = tools::seed_volunteer(&pool, "Ana").await;
    let u2 = tools::seed_volunteer(&pool, "Bruno").await;
    tools::seed_user(&pool, "Carla", "VOLUNTEER", "INACTIVE").await;
    tools::seed_user(&pool, "Dinah", "COORDINATOR", "ACTIVE").await;

    // Two schedules with pending rows, one of them doubly pending.
    services
        .scheduling
        .create(&coordinator, &input("2024-06-01", (9, 0), "Worship", worship, vec![u1, u2]))
        .await
        .unwrap();
    services
        .scheduling
        .create(&coordinator, &input("2024-06-08", (9, 0), "Worship", worship, vec![u1]))
        .await
        .unwrap();

    let summary = services.reports.summary(&coordinator).await.unwrap();
    assert_eq!(
        summary,
        DashboardSummary::Coordinator {
            active_volunteers: 2,
            pending_schedules: 2,
        }
    );
}

#[tokio::test]
async fn test_volunteer_summary_counts() {
    let (pool, services) = tools::setup_test_services().await;
    let coordinator = Caller::coordinator(1);

    let worship = tools::seed_ministry(&pool, "Worship").await;
    let u1 = tools::seed_volunteer(&pool, "Ana").await;

    let today = Utc::now().date_naive();
    let future = today.checked_add_days(Days::new(30)).unwrap();
    let past = today.checked_sub_days(Days::new(30)).unwrap();

    let upcoming_schedule = services
        .scheduling
        .create(
            &coordinator,
            &input(&future.to_string(), (9, 0), "Worship", worship, vec![u1]),
        )
        .await
        .unwrap();
    services
        .scheduling
        .create(
            &coordinator,
            &input(&past.to_string(), (9, 0), "Worship", worship, vec![u1]),
        )
        .await
        .unwrap();

    // Confirm the upcoming one; it stays "upcoming" but is no longer pending.
    let assignment_id = upcoming_schedule.volunteers[0].assignment_id;
    services
        .scheduling
        .confirm(&Caller::volunteer(u1), assignment_id)
        .await
        .unwrap();

    let summary = services.reports.summary(&Caller::volunteer(u1)).await.unwrap();
    assert_eq!(
        summary,
        DashboardSummary::Volunteer {
            upcoming: 1,
            pending_confirmations: 1,
        }
    );
}
