//! Stock levels

use super::{
    BrickSpawn, CollectibleSpawn, EnemySpawn, ExitDoorSpawn, FlagpoleSpawn, LevelDescriptor,
    QuestionBlockSpawn,
};
use crate::sim::aabb::Aabb;
use crate::sim::block::BlockContents;
use crate::sim::completion::ExitKind;
use crate::sim::enemy::KoopaColor;

const TILE_WIDTH: f32 = 60.0;
const GROUND_Y: f32 = 560.0;
const GROUND_HEIGHT: f32 = 40.0;
const WORLD_WIDTH: f32 = 2100.0;

/// Ground tiles covering columns `from..to`
fn ground(from: u32, to: u32) -> impl Iterator<Item = Aabb> {
    (from..to).map(|i| Aabb::new(i as f32 * TILE_WIDTH, GROUND_Y, TILE_WIDTH, GROUND_HEIGHT))
}

fn ledge(x: f32, y: f32, width: f32) -> Aabb {
    Aabb::new(x, y, width, 20.0)
}

fn coins(points: &[(f32, f32)]) -> Vec<CollectibleSpawn> {
    points
        .iter()
        .map(|&(x, y)| CollectibleSpawn::Coin { x, y })
        .collect()
}

fn bricks(points: &[(f32, f32)]) -> Vec<BrickSpawn> {
    points.iter().map(|&(x, y)| BrickSpawn { x, y }).collect()
}

fn question(x: f32, y: f32, contents: BlockContents) -> QuestionBlockSpawn {
    QuestionBlockSpawn { x, y, contents }
}

pub(super) fn levels() -> Vec<LevelDescriptor> {
    vec![green_hill(), underground_caves(), sky_castle()]
}

fn green_hill() -> LevelDescriptor {
    let mut platforms: Vec<Aabb> = ground(0, 35).collect();
    platforms.extend([
        ledge(300.0, 450.0, 120.0),
        ledge(500.0, 400.0, 120.0),
        ledge(750.0, 350.0, 120.0),
    ]);

    LevelDescriptor {
        id: 1,
        name: "Green Hill".to_string(),
        time_limit: 400,
        world_width: WORLD_WIDTH,
        platforms,
        enemies: vec![
            EnemySpawn::Goomba { x: 400.0, y: 480.0 },
            EnemySpawn::Goomba { x: 650.0, y: 480.0 },
            EnemySpawn::Goomba { x: 900.0, y: 480.0 },
        ],
        collectibles: coins(&[(350.0, 420.0), (380.0, 420.0), (550.0, 370.0), (800.0, 320.0)]),
        question_blocks: vec![
            question(320.0, 418.0, BlockContents::Coin),
            question(520.0, 368.0, BlockContents::Mushroom),
        ],
        brick_blocks: bricks(&[(352.0, 418.0), (384.0, 418.0)]),
        flagpole: Some(FlagpoleSpawn { x: 1650.0, y: 260.0 }),
        exit_door: Some(ExitDoorSpawn {
            x: 1750.0,
            y: 496.0,
            kind: ExitKind::Door,
        }),
    }
}

fn underground_caves() -> LevelDescriptor {
    // Ground with a pit between columns 15 and 20, plus a landing under the goal
    let mut platforms: Vec<Aabb> = ground(0, 15).chain(ground(20, 35)).collect();
    platforms.extend([
        ledge(250.0, 480.0, 80.0),
        ledge(400.0, 420.0, 80.0),
        ledge(550.0, 360.0, 80.0),
        ledge(700.0, 300.0, 120.0),
        ledge(900.0, 400.0, 100.0),
    ]);

    LevelDescriptor {
        id: 2,
        name: "Underground Caves".to_string(),
        time_limit: 350,
        world_width: WORLD_WIDTH,
        platforms,
        enemies: vec![
            EnemySpawn::Goomba { x: 300.0, y: 480.0 },
            EnemySpawn::Koopa {
                x: 500.0,
                y: 470.0,
                color: KoopaColor::Green,
            },
            EnemySpawn::Goomba { x: 800.0, y: 480.0 },
            EnemySpawn::Koopa {
                x: 1000.0,
                y: 470.0,
                color: KoopaColor::Red,
            },
            EnemySpawn::Piranha { x: 1100.0, y: 480.0 },
        ],
        collectibles: coins(&[
            (280.0, 450.0),
            (430.0, 390.0),
            (580.0, 330.0),
            (730.0, 270.0),
            (760.0, 270.0),
            (930.0, 370.0),
        ]),
        question_blocks: vec![
            question(280.0, 448.0, BlockContents::Coin),
            question(430.0, 388.0, BlockContents::Fire),
            question(730.0, 268.0, BlockContents::Coin),
        ],
        brick_blocks: bricks(&[
            (312.0, 448.0),
            (344.0, 448.0),
            (462.0, 388.0),
            (494.0, 388.0),
            (762.0, 268.0),
        ]),
        flagpole: Some(FlagpoleSpawn { x: 1850.0, y: 260.0 }),
        exit_door: Some(ExitDoorSpawn {
            x: 1950.0,
            y: 496.0,
            kind: ExitKind::Pipe,
        }),
    }
}

fn sky_castle() -> LevelDescriptor {
    let mut platforms: Vec<Aabb> = ground(0, 12).collect();
    platforms.extend([
        ledge(200.0, 500.0, 60.0),
        ledge(350.0, 440.0, 80.0),
        ledge(500.0, 380.0, 100.0),
        ledge(650.0, 320.0, 80.0),
        ledge(800.0, 280.0, 120.0),
        ledge(1000.0, 360.0, 100.0),
        ledge(1200.0, 400.0, 140.0),
        ledge(1400.0, 340.0, 100.0),
    ]);
    // Castle courtyard under the goal
    platforms.extend(ground(26, 35));

    LevelDescriptor {
        id: 3,
        name: "Sky Castle".to_string(),
        time_limit: 300,
        world_width: WORLD_WIDTH,
        platforms,
        enemies: vec![
            EnemySpawn::Koopa {
                x: 380.0,
                y: 350.0,
                color: KoopaColor::Red,
            },
            EnemySpawn::Goomba { x: 530.0, y: 330.0 },
            EnemySpawn::Koopa {
                x: 680.0,
                y: 270.0,
                color: KoopaColor::Green,
            },
            EnemySpawn::Goomba { x: 830.0, y: 250.0 },
            EnemySpawn::Goomba { x: 860.0, y: 250.0 },
            EnemySpawn::Koopa {
                x: 1030.0,
                y: 310.0,
                color: KoopaColor::Red,
            },
            EnemySpawn::Piranha { x: 1250.0, y: 320.0 },
        ],
        collectibles: coins(&[
            (220.0, 470.0),
            (380.0, 410.0),
            (530.0, 350.0),
            (680.0, 290.0),
            (830.0, 250.0),
            (860.0, 250.0),
            (890.0, 250.0),
            (1030.0, 330.0),
            (1230.0, 370.0),
            (1260.0, 370.0),
        ]),
        question_blocks: vec![
            question(380.0, 408.0, BlockContents::Mushroom),
            question(680.0, 288.0, BlockContents::Fire),
            question(1030.0, 328.0, BlockContents::Coin),
        ],
        brick_blocks: bricks(&[
            (412.0, 408.0),
            (444.0, 408.0),
            (712.0, 288.0),
            (744.0, 288.0),
            (1062.0, 328.0),
            (1094.0, 328.0),
        ]),
        flagpole: Some(FlagpoleSpawn { x: 1750.0, y: 260.0 }),
        exit_door: Some(ExitDoorSpawn {
            x: 1850.0,
            y: 496.0,
            kind: ExitKind::Portal,
        }),
    }
}
