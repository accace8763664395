use rdlib::{
    cfg::CanvasCfg,
    defer_file_removal,
    file_util::{self, make_test_folder},
    scene_fixture::write_scene_fixture,
    tracing_setup::init_tracing_for_tests,
    Event, Events, ExportError, KeyCode, RectTool, ToolTrigger, Visual,
};
use rectdraw_domain::{PtF, RdResult};

fn at(x: f64, y: f64) -> Option<PtF> {
    Some(PtF { x, y })
}

fn drag(tool: &mut RectTool, from: (f64, f64), to: (f64, f64)) {
    tool.events_tf(
        &Events::default()
            .events(vec![
                Event::Pressed(KeyCode::MouseLeft),
                Event::Held(KeyCode::MouseLeft),
            ])
            .mousepos_canvas(at(from.0, from.1)),
    );
    let mid = ((from.0 + to.0) * 0.5, (from.1 + to.1) * 0.5);
    for p in [mid, to] {
        tool.events_tf(
            &Events::default()
                .events(vec![Event::Held(KeyCode::MouseLeft)])
                .mousepos_canvas(at(p.0, p.1)),
        );
    }
    tool.events_tf(
        &Events::default()
            .events(vec![Event::Released(KeyCode::MouseLeft)])
            .mousepos_canvas(at(to.0, to.1)),
    );
}

fn right_click(tool: &mut RectTool, x: f64, y: f64) {
    tool.events_tf(
        &Events::default()
            .events(vec![Event::Pressed(KeyCode::MouseRight)])
            .mousepos_canvas(at(x, y)),
    );
}

#[test]
fn test_draw_delete_export() -> RdResult<()> {
    init_tracing_for_tests();
    let folder = make_test_folder("draw_session")?;
    let mut tool = RectTool::from_cfg(CanvasCfg::default(), Some(11));

    drag(&mut tool, (1.0, 1.0), (4.0, 3.0));
    drag(&mut tool, (5.0, 5.0), (5.1, 5.1));
    drag(&mut tool, (8.0, 9.0), (6.0, 6.0));
    drag(&mut tool, (0.5, 7.0), (2.0, 9.5));
    let names = tool.registry().names().collect::<Vec<_>>();
    assert_eq!(names, ["rect_1", "rect_3", "rect_4"]);
    // an outline and a center marker per rectangle
    assert_eq!(tool.visuals().len(), 6);

    right_click(&mut tool, 9.5, 0.5);
    assert_eq!(tool.registry().len(), 3);
    right_click(&mut tool, 7.0, 7.0);
    let names = tool.registry().names().collect::<Vec<_>>();
    assert_eq!(names, ["rect_1", "rect_4"]);
    assert!(tool.visuals().iter().all(|v| v.name() != "rect_3"));

    let trigger = tool.events_tf(
        &Events::default().events(vec![Event::Held(KeyCode::Ctrl), Event::Pressed(KeyCode::S)]),
    );
    assert_eq!(trigger, ToolTrigger::Save);
    let written = tool.export(&folder.join("session"))?;
    defer_file_removal!(&written);
    assert_eq!(written, folder.join("session.yaml"));

    let yaml_str = file_util::read_to_string(&written)?;
    let parsed: serde_yaml::Mapping =
        serde_yaml::from_str(&yaml_str).map_err(rectdraw_domain::to_rd)?;
    let keys = parsed
        .keys()
        .filter_map(|k| k.as_str())
        .collect::<Vec<_>>();
    assert_eq!(keys, ["rect_1", "rect_4"]);
    let rect_1 = &parsed["rect_1"];
    assert_eq!(rect_1["width"].as_f64(), Some(3.0));
    assert_eq!(rect_1["height"].as_f64(), Some(2.0));
    let center = rect_1["center"]
        .as_sequence()
        .map(|s| s.iter().filter_map(|v| v.as_f64()).collect::<Vec<_>>());
    assert_eq!(center, Some(vec![2.5, 2.0]));
    let color = tool
        .registry()
        .get("rect_1")
        .map(|anno| anno.color.to_vec());
    let exported_color = rect_1["color"]
        .as_sequence()
        .map(|s| s.iter().filter_map(|v| v.as_f64()).collect::<Vec<_>>());
    assert_eq!(exported_color, color);
    Ok(())
}

#[test]
fn test_clear_and_empty_export() -> RdResult<()> {
    init_tracing_for_tests();
    let folder = make_test_folder("draw_session_clear")?;
    let mut tool = RectTool::from_cfg(CanvasCfg::default(), None);
    drag(&mut tool, (1.0, 1.0), (4.0, 3.0));
    drag(&mut tool, (2.0, 2.0), (3.0, 3.0));
    tool.clear_all();
    assert!(tool.visuals().is_empty());
    assert_eq!(tool.summary(), "No rectangles\nLeft-click and drag to draw rectangles");
    let path = folder.join("nothing.yaml");
    assert_eq!(tool.export(&path), Err(ExportError::EmptyRegistry));
    assert!(!path.exists());
    drag(&mut tool, (1.0, 1.0), (4.0, 3.0));
    assert_eq!(tool.registry().names().collect::<Vec<_>>(), ["rect_3"]);
    Ok(())
}

#[test]
fn test_drag_leaving_canvas() {
    init_tracing_for_tests();
    let mut tool = RectTool::from_cfg(CanvasCfg::default(), Some(1));
    tool.events_tf(
        &Events::default()
            .events(vec![Event::Pressed(KeyCode::MouseLeft)])
            .mousepos_canvas(at(2.0, 2.0)),
    );
    tool.events_tf(
        &Events::default()
            .events(vec![Event::Held(KeyCode::MouseLeft)])
            .mousepos_canvas(at(4.0, 4.0)),
    );
    let draft_outline = tool.visuals();
    assert!(matches!(draft_outline.as_slice(), [Visual::Outline(_)]));
    tool.events_tf(&Events::default().events(vec![Event::Held(KeyCode::MouseLeft)]));
    assert_eq!(tool.visuals().len(), 1);
    tool.events_tf(&Events::default().events(vec![Event::Released(KeyCode::MouseLeft)]));
    assert!(tool.visuals().is_empty());
    assert!(tool.registry().is_empty());
}

#[test]
fn test_env_fixture() -> RdResult<()> {
    init_tracing_for_tests();
    let folder = make_test_folder("env_fixture")?;
    let path = folder.join("multi_env_dict_config.yaml");
    defer_file_removal!(&path);
    write_scene_fixture(&path, 5, Some(8))?;
    let parsed: serde_yaml::Value =
        serde_yaml::from_str(&file_util::read_to_string(&path)?).map_err(rectdraw_domain::to_rd)?;
    assert_eq!(parsed["env_count"].as_u64(), Some(5));
    let envs = parsed["envs"]
        .as_mapping()
        .map(|m| m.keys().filter_map(|k| k.as_str()).collect::<Vec<_>>());
    assert_eq!(
        envs,
        Some(vec![
            "quadrotor_env_1",
            "quadrotor_env_2",
            "quadrotor_env_3",
            "quadrotor_env_4",
            "quadrotor_env_5"
        ])
    );
    let sim_dt = parsed["envs"]["quadrotor_env_5"]["sim_dt"].as_f64();
    assert!(sim_dt.is_some_and(|dt| (0.1..=1.0).contains(&dt)));
    Ok(())
}
