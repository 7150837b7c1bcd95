mod common;

use common::monster::*;
use vellum_common::error::ErrorKind;
use vellum_format::{BufferBuilder, UnionOffset, root, root_with_identifier};

fn build_orc() -> Vec<u8> {
    let mut builder = BufferBuilder::new();
    let name = builder.create_string("Orc").unwrap();
    let inventory = builder.create_byte_vector(&[1, 2, 3]).unwrap();
    let orc = create_monster(
        &mut builder,
        &MonsterArgs {
            hp: 10,
            name: Some(name),
            inventory: Some(inventory),
            ..Default::default()
        },
    )
    .unwrap();
    finish_monster_buffer(&mut builder, orc).unwrap();
    builder.into_finished().unwrap().into_vec()
}

#[test]
fn test_orc_scenario() {
    let buf = build_orc();
    let monster = root_as_monster(&buf).unwrap();
    assert_eq!(monster.mana(), 150);
    assert!(!monster.table().has(slot::MANA));
    assert_eq!(monster.table().field_offset(slot::MANA), 0);
    assert_eq!(monster.hp(), 10);
    assert_eq!(monster.name(), "Orc");
    assert_eq!(monster.inventory_length(), 3);
    assert_eq!(monster.inventory().unwrap().get(1), Some(2));
    assert_eq!(monster.inventory().unwrap().data_bytes(), &[1, 2, 3]);
    assert_eq!(monster.color(), COLOR_BLUE);
    assert!(monster.pos().is_none());
    assert!(monster.enemy().is_none());
    assert_eq!(monster.test_type(), any::NONE);
    assert!(!monster.testbool());
}

#[test]
fn test_missing_required_name() {
    let mut builder = BufferBuilder::new();
    let err = create_monster(&mut builder, &MonsterArgs::default()).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::RequiredFieldMissing { slot: missing } if *missing == slot::NAME
    ));
}

#[test]
fn test_wrong_identifier() {
    let buf = build_orc();
    let err = root_with_identifier(&buf, b"WEAP").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::IdentifierMismatch { .. }));
    // Callers that skip the check can still read.
    let table = root(&buf).unwrap();
    assert_eq!(table.get::<i16>(slot::HP, DEFAULT_HP), 10);
}

#[test]
fn test_full_monster() {
    let mut builder = BufferBuilder::new();

    let fred_name = builder.create_string("Fred").unwrap();
    let fred = create_monster(
        &mut builder,
        &MonsterArgs {
            name: Some(fred_name),
            ..Default::default()
        },
    )
    .unwrap();

    let wilma_name = builder.create_string("Wilma").unwrap();
    let wilma = create_monster(
        &mut builder,
        &MonsterArgs {
            name: Some(wilma_name),
            hp: 20,
            ..Default::default()
        },
    )
    .unwrap();
    let barney_name = builder.create_string("Barney").unwrap();
    let barney = create_monster(
        &mut builder,
        &MonsterArgs {
            name: Some(barney_name),
            hp: 30,
            ..Default::default()
        },
    )
    .unwrap();

    let name = builder.create_string("MyMonster").unwrap();
    let inventory = builder.create_byte_vector(&[0, 1, 2, 3, 4]).unwrap();
    let test4 = builder
        .create_vector_of_structs(&[
            Vec3 {
                x: 10.0,
                y: 20.0,
                z: 30.0,
            },
            Vec3 {
                x: 40.0,
                y: 50.0,
                z: 60.0,
            },
        ])
        .unwrap();
    let s1 = builder.create_string("test1").unwrap();
    let s2 = builder.create_string("test2").unwrap();
    let strings = builder.create_vector_of_offsets(&[s1, s2]).unwrap();
    let tables = builder.create_vector_of_offsets(&[wilma, barney]).unwrap();

    let monster = create_monster(
        &mut builder,
        &MonsterArgs {
            pos: Some(Vec3 {
                x: 1.0,
                y: 2.0,
                z: 3.0,
            }),
            hp: 80,
            name: Some(name),
            inventory: Some(inventory),
            color: 2,
            test: UnionOffset::new(any::MONSTER, fred).unwrap(),
            test4: Some(test4),
            testarrayofstring: Some(strings),
            testarrayoftables: Some(tables),
            enemy: Some(fred),
            testbool: true,
            ..Default::default()
        },
    )
    .unwrap();
    finish_monster_buffer(&mut builder, monster).unwrap();

    let buf = builder.finished_data().unwrap();
    let monster = root_as_monster(buf).unwrap();
    assert_eq!(monster.name(), "MyMonster");
    assert_eq!(monster.hp(), 80);
    assert_eq!(monster.mana(), 150);
    assert_eq!(monster.color(), 2);
    assert!(monster.testbool());
    assert_eq!(
        monster.pos(),
        Some(Vec3 {
            x: 1.0,
            y: 2.0,
            z: 3.0
        })
    );
    assert_eq!(
        monster.inventory().unwrap().iter().sum::<u8>(),
        10
    );

    assert_eq!(monster.test_type(), any::MONSTER);
    assert_eq!(monster.test_as_monster().unwrap().name(), "Fred");
    assert!(monster.test_as_vec3().is_none());
    assert_eq!(monster.enemy().unwrap().name(), "Fred");

    let test4 = monster.test4().unwrap();
    assert_eq!(test4.len(), 2);
    assert_eq!(test4.get(1).unwrap().y, 50.0);

    let strings = monster
        .testarrayofstring()
        .unwrap()
        .iter()
        .collect::<vellum_common::Result<Vec<_>>>()
        .unwrap();
    assert_eq!(strings, vec!["test1", "test2"]);

    let tables = monster.testarrayoftables().unwrap();
    let summary = tables
        .iter()
        .map(|m| (m.name(), m.hp()))
        .collect::<Vec<_>>();
    assert_eq!(summary, vec![("Wilma", 20), ("Barney", 30)]);

    // Wilma and Barney share a layout; Fred leaves hp at its default.
    let wilma = tables[0].table().vtable().loc();
    assert_eq!(tables[1].table().vtable().loc(), wilma);
    let fred = monster.enemy().unwrap().table().vtable().loc();
    assert_ne!(fred, wilma);
}

#[test]
fn test_struct_union_payload() {
    let mut builder = BufferBuilder::new();
    let target = builder
        .create_struct(&Vec3 {
            x: 7.0,
            y: 8.0,
            z: 9.0,
        })
        .unwrap();
    let name = builder.create_string("Pointer").unwrap();
    let monster = create_monster(
        &mut builder,
        &MonsterArgs {
            name: Some(name),
            test: UnionOffset::new(any::VEC3, target).unwrap(),
            ..Default::default()
        },
    )
    .unwrap();
    finish_monster_buffer(&mut builder, monster).unwrap();

    let monster = root_as_monster(builder.finished_data().unwrap()).unwrap();
    assert!(monster.test_as_monster().is_none());
    assert_eq!(monster.test_as_vec3().unwrap().z, 9.0);
}

#[test]
fn test_nested_monster() {
    let mut inner = BufferBuilder::new();
    let name = inner.create_string("Inner").unwrap();
    let inner_root = create_monster(
        &mut inner,
        &MonsterArgs {
            name: Some(name),
            hp: 5,
            ..Default::default()
        },
    )
    .unwrap();
    finish_monster_buffer(&mut inner, inner_root).unwrap();
    let inner = inner.into_finished().unwrap();

    let mut outer = BufferBuilder::new();
    // Give the outer buffer a different layout for the same schema.
    let inventory = outer.create_byte_vector(&[9]).unwrap();
    let nested = outer.create_nested_buffer(inner.as_bytes()).unwrap();
    let name = outer.create_string("Outer").unwrap();
    let outer_root = create_monster(
        &mut outer,
        &MonsterArgs {
            name: Some(name),
            mana: 1,
            inventory: Some(inventory),
            testnestedflatbuffer: Some(nested),
            ..Default::default()
        },
    )
    .unwrap();
    finish_monster_buffer(&mut outer, outer_root).unwrap();

    let buf = outer.finished_data().unwrap();
    let outer = root_as_monster(buf).unwrap();
    assert_eq!(outer.name(), "Outer");
    let bytes = outer.testnestedflatbuffer().unwrap();
    assert_eq!(bytes, inner.as_bytes());

    let nested = outer.testnestedflatbuffer_nested_root().unwrap();
    assert_eq!(nested.name(), "Inner");
    assert_eq!(nested.hp(), 5);
    assert_eq!(nested.mana(), 150);
    assert_eq!(nested.inventory_length(), 0);

    // The same bytes decode identically on their own.
    let standalone = root_as_monster(inner.as_bytes()).unwrap();
    assert_eq!(standalone.name(), nested.name());
    assert_eq!(standalone.hp(), nested.hp());
}

#[test]
fn test_mutate_monster() {
    let mut buf = build_orc();
    let before = buf.clone();
    let mut monster = root_as_monster_mut(&mut buf).unwrap();

    // Mana was elided, so it cannot be mutated into existence.
    assert!(!monster.mutate_mana(10));
    assert!(!monster.mutate_pos_z(1.0));
    assert!(monster.mutate_hp(55));
    assert!(monster.mutate_inventory(2, 30));
    assert!(!monster.mutate_inventory(3, 40));

    let view = monster.as_monster();
    assert_eq!(view.hp(), 55);
    assert_eq!(view.mana(), 150);
    assert_eq!(
        view.inventory().unwrap().iter().collect::<Vec<_>>(),
        vec![1, 2, 30]
    );
    assert_eq!(buf.len(), before.len());

    let mut monster = root_as_monster_mut(&mut buf).unwrap();
    assert!(monster.mutate_hp(10));
    assert!(monster.mutate_inventory(2, 3));
    assert_eq!(buf, before);
}
