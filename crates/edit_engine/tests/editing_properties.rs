//! Whole-document properties that must hold after any command sequence

use doc_model::{MonthCode, PageType, PlannerDocument, Rect, BUNDLE_LEN};
use edit_engine::*;
use proptest::prelude::*;
use std::collections::HashSet;

fn assert_ids_unique(doc: &PlannerDocument) {
    let pages: HashSet<_> = doc.pages().iter().map(|p| p.id()).collect();
    assert_eq!(pages.len(), doc.page_count(), "page ids collide");

    let blocks: Vec<_> = doc.pages().iter().flat_map(|p| p.blocks()).map(|b| b.id()).collect();
    let unique: HashSet<_> = blocks.iter().copied().collect();
    assert_eq!(unique.len(), blocks.len(), "block ids collide");
}

fn assert_month_pages_keep_calendar(doc: &PlannerDocument) {
    for (index, page) in doc.pages().iter().enumerate() {
        if page.page_type == PageType::Month {
            let grid = page.calendar_grid();
            assert!(grid.is_some_and(|b| b.locked), "month page {index} lost its calendar grid");
        }
    }
}

fn assert_cursor_valid(doc: &PlannerDocument) {
    assert!(doc.current_page_index() < doc.page_count());
    if let Some(id) = doc.selected_block_id() {
        assert!(doc.current_page().contains_block(id));
    }
}

#[derive(Debug, Clone)]
enum Op {
    AddBlock(usize),
    AddPage,
    Duplicate,
    LayoutToNext,
    Clear,
    Template,
    Background(bool),
    Select(usize),
    ToggleLock,
    Delete,
    Move(f64, f64, f64, f64),
    Bundle(usize),
}

const ASSETS: [&str; 5] = [
    "standardcover.png",
    "Grid.svg",
    "janheader.svg",
    "weekheaderstart.svg",
    "HabitTracker.svg",
];

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..ASSETS.len()).prop_map(Op::AddBlock),
        Just(Op::AddPage),
        Just(Op::Duplicate),
        Just(Op::LayoutToNext),
        Just(Op::Clear),
        Just(Op::Template),
        any::<bool>().prop_map(Op::Background),
        (0usize..50).prop_map(Op::Select),
        Just(Op::ToggleLock),
        Just(Op::Delete),
        (-100.0..2000.0f64, -100.0..2000.0f64, -10.0..1500.0f64, -10.0..1500.0f64)
            .prop_map(|(x, y, w, h)| Op::Move(x, y, w, h)),
        (0usize..12).prop_map(Op::Bundle),
    ]
}

fn run(engine: &mut EditingEngine, op: Op) {
    let result = match op {
        Op::AddBlock(i) => engine.execute(&AddBlock::auto(ASSETS[i])),
        Op::AddPage => engine.execute(&AddBlankPage::new()),
        Op::Duplicate => engine.execute(&DuplicateCurrentPage::new()),
        Op::LayoutToNext => engine.execute(&ApplyLayoutToNextPage::new()),
        Op::Clear => engine.execute_confirmed(&ClearCurrentPage::new(), &true),
        Op::Template => engine.execute_confirmed(&ApplyTemplate::new("weeklyplanner.png"), &true),
        Op::Background(all) => {
            let cmd = if all {
                ChangeBackground::all("cheetah.png")
            } else {
                ChangeBackground::current("marble.png")
            };
            engine.execute(&cmd)
        }
        Op::Select(i) => engine.execute(&SelectPage::new(i)),
        Op::ToggleLock => engine.execute(&ToggleLock::selected()),
        Op::Delete => engine.execute(&DeleteBlock::selected()),
        Op::Move(x, y, w, h) => match engine.document().selected_block_id() {
            Some(id) => engine.execute(&UpdateBlockGeometry::new(id, Rect::new(x, y, w, h))),
            None => Ok(Outcome::Unchanged),
        },
        Op::Bundle(m) => engine.execute(&AddMonthBundle::new(MonthCode::ALL[m])),
    };
    // Rejections are fine; the document must stay consistent either way
    let _ = result;
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn invariants_hold_after_any_sequence(ops in prop::collection::vec(op_strategy(), 1..25)) {
        let mut engine = EditingEngine::default();
        for op in ops {
            run(&mut engine, op);
            let doc = engine.document();
            assert_cursor_valid(doc);
            assert_ids_unique(doc);
            assert_month_pages_keep_calendar(doc);
            for block in doc.pages().iter().flat_map(|p| p.blocks()) {
                let rect = block.rect();
                prop_assert!(rect.x >= 0.0 && rect.y >= 0.0);
                prop_assert!(rect.width >= doc_model::MIN_BLOCK_SIZE);
                prop_assert!(rect.height >= doc_model::MIN_BLOCK_SIZE);
            }
        }
    }
}

#[test]
fn clear_is_idempotent() {
    let mut engine = EditingEngine::default();
    for asset in ASSETS {
        engine.execute(&AddBlock::auto(asset)).unwrap();
    }
    engine.execute_confirmed(&ClearCurrentPage::new(), &true).unwrap();
    let once = engine.document().clone();
    let outcome = engine.execute_confirmed(&ClearCurrentPage::new(), &true).unwrap();

    assert_eq!(outcome, Outcome::Unchanged);
    assert_eq!(engine.document().current_page().blocks(), once.current_page().blocks());
    assert!(once.current_page().blocks().iter().all(|b| b.locked));
}

#[test]
fn bundle_adds_exactly_one_bundle_of_pages() {
    let mut engine = EditingEngine::default();
    let before = engine.document().page_count();
    engine.execute(&AddMonthBundle::new(MonthCode::Jul)).unwrap();

    let doc = engine.document();
    assert_eq!(doc.page_count(), before + BUNDLE_LEN);
    assert_eq!(doc.current_page().name, "JUL Overview");
    assert_ids_unique(doc);
}

#[test]
fn background_to_all_pages() {
    let mut engine = EditingEngine::default();
    engine.execute(&AddMonthBundle::new(MonthCode::Feb)).unwrap();
    engine.execute(&AddBlankPage::new()).unwrap();
    engine.execute(&ChangeBackground::all("cheetah.png")).unwrap();

    assert!(engine
        .document()
        .pages()
        .iter()
        .all(|p| p.background.as_str() == "cheetah.png"));
}

#[test]
fn duplicated_page_shares_no_ids() {
    let mut engine = EditingEngine::default();
    engine.execute(&AddBlock::auto("Grid.svg")).unwrap();
    engine.execute(&AddBlock::auto("janheader.svg")).unwrap();
    engine.execute(&DuplicateCurrentPage::new()).unwrap();
    engine.execute(&DuplicateCurrentPage::new()).unwrap();

    let doc = engine.document();
    assert_eq!(doc.page_count(), 3);
    assert_eq!(doc.current_page().name, "Planner Start (Copy) (Copy)");
    assert_ids_unique(doc);
}

#[test]
fn month_page_survives_layout_and_clear() {
    let mut engine = EditingEngine::default();
    engine.execute(&AddBlock::auto("Grid.svg")).unwrap();
    engine.execute(&AddMonthBundle::new(MonthCode::Mar)).unwrap();

    engine.execute_confirmed(&ClearCurrentPage::new(), &true).unwrap();
    let grid = engine.document().current_page().calendar_grid().unwrap().id();
    assert!(engine.execute(&ToggleLock::new(grid)).is_err());
    assert!(engine.execute(&DeleteBlock::new(grid)).is_err());

    engine.execute(&SelectPage::new(0)).unwrap();
    let err = engine.execute(&ApplyLayoutToNextPage::new()).unwrap_err();
    assert_eq!(err, EditError::CalendarGridProtected { page: 1 });
    assert_month_pages_keep_calendar(engine.document());
}
