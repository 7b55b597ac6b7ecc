use classavail::catalog::{extract_tokens, parse_courses, CatalogError, Field, SearchCriteria};

const ICS_PAGE: &str = include_str!("fixtures/ics_avail.html");

#[test]
fn test_page_yields_courses_in_order() {
    let tokens = extract_tokens(ICS_PAGE);
    let courses = parse_courses(tokens).unwrap();

    let crns: Vec<&str> = courses.iter().map(|c| c.crn.as_str()).collect();
    assert_eq!(crns, vec!["12345", "23456", "34567"]);

    let intro = &courses[0];
    assert_eq!(intro.focus, "none");
    assert_eq!(intro.department, "ICS");
    assert_eq!(intro.instructor, "R. Narayan");
    assert_eq!(intro.meeting_times.len(), 2);
    assert_eq!(intro.meeting_times[1].room, "POST 319");

    let ethics = &courses[1];
    assert_eq!(ethics.focus, "OC");
    assert_eq!(ethics.title, "Ethics & Computing");
    assert_eq!(ethics.credits, "1-3");
    assert_eq!(ethics.seats_available(), Ok(0));
    assert_eq!(ethics.meeting_times[0].end_time, "TBA");
    assert!(ethics.is_online());

    let topics = &courses[2];
    assert_eq!(topics.focus, "WI");
    assert_eq!(topics.instructor, "O'Neil-Kamaka");
    assert_eq!(topics.meeting_times[0].dates, "08/23-10/15");
}

#[test]
fn test_filters_over_parsed_page() {
    let courses = parse_courses(extract_tokens(ICS_PAGE)).unwrap();

    let online = SearchCriteria {
        online_only: true,
        ..Default::default()
    };
    let kept = online.filter(courses.clone());
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].course_code, "ICS 390");

    let writing = SearchCriteria {
        focus: Some("WI".to_string()),
        ..Default::default()
    };
    let kept = writing.filter(courses);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].crn, "34567");
}

#[test]
fn test_malformed_page_returns_no_courses() {
    let broken = ICS_PAGE.replace("Topics: Women's Health", "Topics 2: Women's Health");
    let err: CatalogError = parse_courses(extract_tokens(&broken)).unwrap_err().into();

    match err {
        CatalogError::Parse(failure) => {
            assert_eq!(failure.field, Field::Title);
            assert_eq!(failure.current, "Topics 2: Women's Health");
            assert_eq!(failure.previous, "002");
        }
        other => panic!("expected parse failure, got {other:?}"),
    }
}
