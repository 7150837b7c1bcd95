//! Accessors for the `Monster` test schema, written the way a code generator
//! would emit them on top of the engine.

use vellum_common::Result;
use vellum_format::{
    BufferBuilder, FixedStruct, ForwardsUOffset, StringOffset, StructElem, Table, TableMut,
    TableOffset, UnionOffset, Vector, VectorOffset, root_mut, root_with_identifier,
    scalar::{read_scalar_at, write_scalar_at},
};

pub const MONSTER_IDENTIFIER: &[u8; 4] = b"MONS";

pub mod slot {
    pub const POS: u16 = 0;
    pub const MANA: u16 = 1;
    pub const HP: u16 = 2;
    pub const NAME: u16 = 3;
    pub const INVENTORY: u16 = 4;
    pub const COLOR: u16 = 5;
    pub const TEST_TYPE: u16 = 6;
    pub const TEST: u16 = 7;
    pub const TEST4: u16 = 8;
    pub const TESTARRAYOFSTRING: u16 = 9;
    pub const TESTARRAYOFTABLES: u16 = 10;
    pub const ENEMY: u16 = 11;
    pub const TESTNESTEDFLATBUFFER: u16 = 12;
    pub const TESTBOOL: u16 = 13;

    pub const COUNT: u16 = 14;
}

pub const DEFAULT_MANA: i16 = 150;
pub const DEFAULT_HP: i16 = 100;
pub const COLOR_BLUE: u8 = 8;

/// Tags of the `Any` union.
pub mod any {
    pub const NONE: u8 = 0;
    pub const MONSTER: u8 = 1;
    pub const VEC3: u8 = 2;
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl FixedStruct for Vec3 {
    const SIZE: usize = 12;
    const ALIGN: usize = 4;

    fn write_to(&self, dst: &mut [u8]) {
        write_scalar_at(dst, 0, self.x);
        write_scalar_at(dst, 4, self.y);
        write_scalar_at(dst, 8, self.z);
    }

    fn read_from(src: &[u8]) -> Self {
        Vec3 {
            x: read_scalar_at(src, 0),
            y: read_scalar_at(src, 4),
            z: read_scalar_at(src, 8),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Monster<'a> {
    table: Table<'a>,
}

pub fn root_as_monster(buf: &[u8]) -> Result<Monster<'_>> {
    root_with_identifier(buf, MONSTER_IDENTIFIER).map(Monster::init)
}

impl<'a> Monster<'a> {
    pub fn init(table: Table<'a>) -> Monster<'a> {
        Monster { table }
    }

    pub fn table(&self) -> Table<'a> {
        self.table
    }

    pub fn pos(&self) -> Option<Vec3> {
        self.table.get_struct_as::<Vec3>(slot::POS)
    }

    pub fn mana(&self) -> i16 {
        self.table.get::<i16>(slot::MANA, DEFAULT_MANA)
    }

    pub fn hp(&self) -> i16 {
        self.table.get::<i16>(slot::HP, DEFAULT_HP)
    }

    pub fn name(&self) -> &'a str {
        self.table
            .get_str(slot::NAME)
            .unwrap()
            .expect("required field name")
    }

    pub fn inventory(&self) -> Option<Vector<'a, u8>> {
        self.table.get_vector::<u8>(slot::INVENTORY)
    }

    pub fn inventory_length(&self) -> usize {
        self.table.vector_len(slot::INVENTORY)
    }

    pub fn color(&self) -> u8 {
        self.table.get::<u8>(slot::COLOR, COLOR_BLUE)
    }

    pub fn test_type(&self) -> u8 {
        self.table.get::<u8>(slot::TEST_TYPE, any::NONE)
    }

    pub fn test_as_monster(&self) -> Option<Monster<'a>> {
        let union = self.table.get_union(slot::TEST_TYPE, slot::TEST).unwrap()?;
        (union.tag() == any::MONSTER).then(|| Monster::init(union.as_table()))
    }

    pub fn test_as_vec3(&self) -> Option<Vec3> {
        let union = self.table.get_union(slot::TEST_TYPE, slot::TEST).unwrap()?;
        (union.tag() == any::VEC3).then(|| union.as_struct::<Vec3>())
    }

    pub fn test4(&self) -> Option<Vector<'a, StructElem<Vec3>>> {
        self.table.get_vector(slot::TEST4)
    }

    pub fn testarrayofstring(&self) -> Option<Vector<'a, ForwardsUOffset<&'a str>>> {
        self.table.get_vector(slot::TESTARRAYOFSTRING)
    }

    pub fn testarrayoftables(&self) -> Option<Vec<Monster<'a>>> {
        self.table
            .get_vector::<ForwardsUOffset<Table<'a>>>(slot::TESTARRAYOFTABLES)
            .map(|v| v.iter().map(Monster::init).collect())
    }

    pub fn enemy(&self) -> Option<Monster<'a>> {
        self.table.get_table(slot::ENEMY).map(Monster::init)
    }

    pub fn testnestedflatbuffer(&self) -> Option<&'a [u8]> {
        self.table.get_nested_buffer(slot::TESTNESTEDFLATBUFFER)
    }

    pub fn testnestedflatbuffer_nested_root(&self) -> Option<Monster<'a>> {
        self.table
            .get_nested_root(slot::TESTNESTEDFLATBUFFER)
            .map(|root| Monster::init(root.unwrap()))
    }

    pub fn testbool(&self) -> bool {
        self.table.get::<bool>(slot::TESTBOOL, false)
    }
}

pub struct MonsterArgs {
    pub pos: Option<Vec3>,
    pub mana: i16,
    pub hp: i16,
    pub name: Option<StringOffset>,
    pub inventory: Option<VectorOffset>,
    pub color: u8,
    pub test: UnionOffset,
    pub test4: Option<VectorOffset>,
    pub testarrayofstring: Option<VectorOffset>,
    pub testarrayoftables: Option<VectorOffset>,
    pub enemy: Option<TableOffset>,
    pub testnestedflatbuffer: Option<VectorOffset>,
    pub testbool: bool,
}

impl Default for MonsterArgs {
    fn default() -> Self {
        MonsterArgs {
            pos: None,
            mana: DEFAULT_MANA,
            hp: DEFAULT_HP,
            name: None,
            inventory: None,
            color: COLOR_BLUE,
            test: UnionOffset::NONE,
            test4: None,
            testarrayofstring: None,
            testarrayoftables: None,
            enemy: None,
            testnestedflatbuffer: None,
            testbool: false,
        }
    }
}

/// Writes a `Monster`, largest fields first, and checks its required fields.
pub fn create_monster(builder: &mut BufferBuilder, args: &MonsterArgs) -> Result<TableOffset> {
    builder.start_object(slot::COUNT)?;
    if let Some(pos) = &args.pos {
        let pos = builder.create_struct(pos)?;
        builder.add_struct(slot::POS, pos)?;
    }
    let offsets = [
        (slot::INVENTORY, args.inventory),
        (slot::TEST4, args.test4),
        (slot::TESTARRAYOFSTRING, args.testarrayofstring),
        (slot::TESTARRAYOFTABLES, args.testarrayoftables),
        (slot::TESTNESTEDFLATBUFFER, args.testnestedflatbuffer),
    ];
    for (slot, offset) in offsets {
        if let Some(offset) = offset {
            builder.add_offset(slot, offset)?;
        }
    }
    if let Some(name) = args.name {
        builder.add_offset(slot::NAME, name)?;
    }
    if let Some(enemy) = args.enemy {
        builder.add_offset(slot::ENEMY, enemy)?;
    }
    builder.add_union(slot::TEST_TYPE, slot::TEST, args.test)?;
    builder.add_scalar::<i16>(slot::MANA, args.mana, DEFAULT_MANA)?;
    builder.add_scalar::<i16>(slot::HP, args.hp, DEFAULT_HP)?;
    builder.add_scalar::<u8>(slot::COLOR, args.color, COLOR_BLUE)?;
    builder.add_scalar::<bool>(slot::TESTBOOL, args.testbool, false)?;
    let monster = builder.end_object()?;
    builder.required(monster, slot::NAME)?;
    Ok(monster)
}

pub fn finish_monster_buffer(builder: &mut BufferBuilder, root: TableOffset) -> Result<()> {
    builder.finish(root, Some(MONSTER_IDENTIFIER))
}

/// Mutable accessors over a finished `Monster`.
pub struct MonsterMut<'a> {
    table: TableMut<'a>,
}

pub fn root_as_monster_mut(buf: &mut [u8]) -> Result<MonsterMut<'_>> {
    root_mut(buf).map(|table| MonsterMut { table })
}

impl MonsterMut<'_> {
    pub fn mutate_hp(&mut self, hp: i16) -> bool {
        self.table.mutate::<i16>(slot::HP, hp)
    }

    pub fn mutate_mana(&mut self, mana: i16) -> bool {
        self.table.mutate::<i16>(slot::MANA, mana)
    }

    pub fn mutate_inventory(&mut self, index: usize, value: u8) -> bool {
        self.table
            .mutate_vector_element::<u8>(slot::INVENTORY, index, value)
    }

    pub fn mutate_pos_z(&mut self, z: f32) -> bool {
        match self.table.struct_mut(slot::POS) {
            Some(mut pos) => {
                pos.set::<f32>(8, z);
                true
            }
            None => false,
        }
    }

    pub fn as_monster(&self) -> Monster<'_> {
        Monster::init(self.table.as_table())
    }
}
