//! End-to-end walks of the configuration lifecycle and the sell flow,
//! driven entirely through the public engine API with a simulated world.

use sellgui::host::WorldHost;
use sellgui::sell::{
    Effect, FieldValue, FormResponse, FormSpec, SellGui, SellGuiStore,
};
use sellgui::sim::SimWorld;
use tempfile::TempDir;
use uuid::Uuid;

const SETTINGS_ITEM: &str = "sellgui:sell_gui_settings";
const SIGNAL_OBJECTIVE: &str = "sellGuiID";

fn token_of(effects: &[Effect]) -> Uuid {
    match effects.first() {
        Some(Effect::ShowForm { token, .. }) => *token,
        other => panic!("expected a form, got {:?}", other),
    }
}

fn claim_owner(gui: &mut SellGui, store: &SellGuiStore, world: &SimWorld, player: &str) {
    let effects = gui.on_item_use(player, SETTINGS_ITEM);
    let token = token_of(&effects);
    gui.resolve_form(store, world, token, FormResponse::Button(0))
        .expect("claim owner");
}

fn create_entry(
    gui: &mut SellGui,
    store: &SellGuiStore,
    world: &SimWorld,
    player: &str,
    raw_id: &str,
    item: &str,
    name: &str,
    raw_value: &str,
) {
    let effects = gui.on_item_use(player, SETTINGS_ITEM);
    let root = token_of(&effects);
    let effects = gui
        .resolve_form(store, world, root, FormResponse::Button(0))
        .expect("open create");
    let form = token_of(&effects);
    gui.resolve_form(
        store,
        world,
        form,
        FormResponse::Submit(vec![
            FieldValue::Text(raw_id.to_string()),
            FieldValue::Text(item.to_string()),
            FieldValue::Text(name.to_string()),
            FieldValue::Text(raw_value.to_string()),
            FieldValue::Index(0),
        ]),
    )
    .expect("submit create");
}

#[test]
fn create_then_delete_returns_to_an_empty_registry() {
    let dir = TempDir::new().expect("tempdir");
    let store = SellGuiStore::open(dir.path()).expect("store");
    let mut gui = SellGui::load(&store, SETTINGS_ITEM, SIGNAL_OBJECTIVE).expect("load");
    let mut world = SimWorld::new();
    world.add_objective("money");

    claim_owner(&mut gui, &store, &world, "owner-1");
    assert!(gui.registry().is_empty());

    create_entry(
        &mut gui, &store, &world, "owner-1", "5", "minecraft:diamond", "Diamond", "10",
    );
    assert_eq!(gui.registry().len(), 1);
    assert_eq!(gui.registry().get(5).expect("entry").value, 10);

    // Delete: selector, then explicit confirmation.
    let effects = gui.on_item_use("owner-1", SETTINGS_ITEM);
    let root = token_of(&effects);
    let effects = gui
        .resolve_form(&store, &world, root, FormResponse::Button(2))
        .expect("open delete");
    let select = token_of(&effects);
    let effects = gui
        .resolve_form(
            &store,
            &world,
            select,
            FormResponse::Submit(vec![FieldValue::Index(0)]),
        )
        .expect("select entry");
    let confirm = token_of(&effects);
    gui.resolve_form(&store, &world, confirm, FormResponse::Button(0))
        .expect("confirm delete");

    assert!(gui.registry().is_empty());

    // The empty registry survives a reload.
    let reloaded = SellGui::load(&store, SETTINGS_ITEM, SIGNAL_OBJECTIVE).expect("reload");
    assert!(reloaded.registry().is_empty());
}

#[test]
fn three_diamonds_selling_two_leaves_one_and_credits_twenty() {
    let dir = TempDir::new().expect("tempdir");
    let store = SellGuiStore::open(dir.path()).expect("store");
    let mut gui = SellGui::load(&store, SETTINGS_ITEM, SIGNAL_OBJECTIVE).expect("load");
    let mut world = SimWorld::new();
    world.add_objective("money");

    claim_owner(&mut gui, &store, &world, "owner-1");
    create_entry(
        &mut gui, &store, &world, "owner-1", "5", "minecraft:diamond", "Diamond", "10",
    );

    world.give("seller-1", "minecraft:diamond", 3);
    world.set_score(SIGNAL_OBJECTIVE, "seller-1", 5);

    let effects = gui.on_tick(&mut world);
    assert!(world.signal_entries(SIGNAL_OBJECTIVE).is_empty());
    let prompt = token_of(&effects);
    let effects = gui
        .resolve_form(
            &store,
            &world,
            prompt,
            FormResponse::Submit(vec![FieldValue::Amount(2)]),
        )
        .expect("confirm amount");
    for effect in &effects {
        world.apply(effect);
    }

    assert_eq!(world.count_items("seller-1", "minecraft:diamond"), 1);
    assert_eq!(world.score("money", "seller-1"), Some(20));
    assert_eq!(
        world.messages(),
        &[(
            "seller-1".to_string(),
            "You sold 2 item(s) of Diamond, for 20".to_string()
        )]
    );
}

#[test]
fn registry_survives_a_process_restart() {
    let dir = TempDir::new().expect("tempdir");
    {
        let store = SellGuiStore::open(dir.path()).expect("store");
        let mut gui = SellGui::load(&store, SETTINGS_ITEM, SIGNAL_OBJECTIVE).expect("load");
        let mut world = SimWorld::new();
        world.add_objective("money");
        world.add_objective("gems");
        claim_owner(&mut gui, &store, &world, "owner-1");
        create_entry(
            &mut gui, &store, &world, "owner-1", "5", "minecraft:diamond", "Diamond", "10",
        );
        create_entry(
            &mut gui, &store, &world, "owner-1", "12", "minecraft:emerald", "Emerald", "7",
        );
    }

    // A fresh store over the same directory sees the same state.
    let store = SellGuiStore::open(dir.path()).expect("reopen");
    let gui = SellGui::load(&store, SETTINGS_ITEM, SIGNAL_OBJECTIVE).expect("reload");
    assert_eq!(gui.registry().len(), 2);
    assert_eq!(gui.registry().get(5).expect("entry").item_id, "minecraft:diamond");
    assert_eq!(gui.registry().get(12).expect("entry").item_id, "minecraft:emerald");
    assert!(gui.permissions().is_owner("owner-1"));
}

#[test]
fn a_second_signal_can_queue_while_a_prompt_is_outstanding() {
    let dir = TempDir::new().expect("tempdir");
    let store = SellGuiStore::open(dir.path()).expect("store");
    let mut gui = SellGui::load(&store, SETTINGS_ITEM, SIGNAL_OBJECTIVE).expect("load");
    let mut world = SimWorld::new();
    world.add_objective("money");

    claim_owner(&mut gui, &store, &world, "owner-1");
    create_entry(
        &mut gui, &store, &world, "owner-1", "5", "minecraft:diamond", "Diamond", "10",
    );

    world.give("seller-1", "minecraft:diamond", 4);
    world.set_score(SIGNAL_OBJECTIVE, "seller-1", 5);
    let first = token_of(&gui.on_tick(&mut world));

    // The player re-signals before answering; the next sweep opens a
    // second prompt rather than blocking on the first.
    world.set_score(SIGNAL_OBJECTIVE, "seller-1", 5);
    let second = token_of(&gui.on_tick(&mut world));
    assert_eq!(gui.pending_forms(), 2);

    for token in [first, second] {
        let effects = gui
            .resolve_form(
                &store,
                &world,
                token,
                FormResponse::Submit(vec![FieldValue::Amount(1)]),
            )
            .expect("confirm");
        for effect in &effects {
            world.apply(effect);
        }
    }
    assert_eq!(world.count_items("seller-1", "minecraft:diamond"), 2);
    assert_eq!(world.score("money", "seller-1"), Some(20));
}

#[test]
fn stale_sell_id_after_deletion_is_discarded() {
    let dir = TempDir::new().expect("tempdir");
    let store = SellGuiStore::open(dir.path()).expect("store");
    let mut gui = SellGui::load(&store, SETTINGS_ITEM, SIGNAL_OBJECTIVE).expect("load");
    let mut world = SimWorld::new();
    world.add_objective("money");

    claim_owner(&mut gui, &store, &world, "owner-1");
    world.give("seller-1", "minecraft:diamond", 3);
    world.set_score(SIGNAL_OBJECTIVE, "seller-1", 9);

    // Id 9 was never configured: the signal is consumed, nothing happens.
    let effects = gui.on_tick(&mut world);
    assert!(effects.is_empty());
    assert!(world.signal_entries(SIGNAL_OBJECTIVE).is_empty());
    assert_eq!(world.count_items("seller-1", "minecraft:diamond"), 3);
    assert_eq!(world.score("money", "seller-1"), None);
}

#[test]
fn form_specs_match_the_menu_contract() {
    let dir = TempDir::new().expect("tempdir");
    let store = SellGuiStore::open(dir.path()).expect("store");
    let mut gui = SellGui::load(&store, SETTINGS_ITEM, SIGNAL_OBJECTIVE).expect("load");
    let mut world = SimWorld::new();
    world.add_objective("money");

    // Owner-claim form first.
    let effects = gui.on_item_use("owner-1", SETTINGS_ITEM);
    match effects.first() {
        Some(Effect::ShowForm { form: FormSpec::Action(action), .. }) => {
            assert_eq!(action.title, "Owner Initialization");
            assert_eq!(action.buttons, vec!["Claim".to_string()]);
        }
        other => panic!("expected owner claim form, got {:?}", other),
    }
    let token = token_of(&effects);
    gui.resolve_form(&store, &world, token, FormResponse::Button(0))
        .expect("claim");

    // Settings root for the owner carries all four buttons in order.
    let effects = gui.on_item_use("owner-1", SETTINGS_ITEM);
    match effects.first() {
        Some(Effect::ShowForm { form: FormSpec::Action(action), .. }) => {
            assert_eq!(action.title, "Sell GUI Settings");
            assert_eq!(
                action.buttons,
                vec![
                    "Create New Sell ID".to_string(),
                    "Edit Existing Sell ID".to_string(),
                    "Delete Existing Sell ID".to_string(),
                    "Sell Settings Permissions".to_string(),
                ]
            );
        }
        other => panic!("expected settings root, got {:?}", other),
    }
    let root = token_of(&effects);
    let effects = gui
        .resolve_form(&store, &world, root, FormResponse::Button(0))
        .expect("open create");
    match effects.first() {
        Some(Effect::ShowForm { form: FormSpec::Modal(modal), .. }) => {
            assert_eq!(modal.title, "Create New ID");
            assert_eq!(modal.fields.len(), 5);
        }
        other => panic!("expected create form, got {:?}", other),
    }
}
