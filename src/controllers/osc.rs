// src/controllers/osc.rs
// OSC Controller
//
// Receives /wall/... messages and queues them as WallCommands.
// The host drains the queue once per frame.

use log::debug;
use nannou_osc as osc;
use std::error::Error;

use crate::content::AssignmentMode;
use crate::layout::LayoutId;
use crate::models::GridKey;

#[derive(Debug, Clone, PartialEq)]
pub enum WallCommand {
    Select(GridKey),
    Deselect,
    Ripple(GridKey),
    Morph { layout: LayoutId, duration: f32 },
    JumpTo(LayoutId),
    Physics(bool),
    Rebuild { size: usize, tiles: Option<usize> },
    ContentMode(AssignmentMode),
    ContentRepeat(bool),
}

pub struct OscController {
    command_queue: Vec<WallCommand>,
    receiver: osc::Receiver,
}

impl OscController {
    pub fn new(port: u16) -> Result<Self, Box<dyn Error>> {
        let receiver = osc::receiver(port)?;

        Ok(Self {
            command_queue: Vec::new(),
            receiver,
        })
    }

    pub fn process_messages(&mut self) {
        for (packet, _addr) in self.receiver.try_iter() {
            for message in packet.into_msgs() {
                match parse_message(&message.addr, &message.args) {
                    Some(command) => self.command_queue.push(command),
                    None => debug!("ignored OSC message {} {:?}", message.addr, message.args),
                }
            }
        }
    }

    pub fn take_commands(&mut self) -> Vec<WallCommand> {
        std::mem::take(&mut self.command_queue)
    }
}

fn index(arg: &osc::Type) -> Option<usize> {
    match arg {
        osc::Type::Int(i) => usize::try_from(*i).ok(),
        _ => None,
    }
}

fn flag(arg: &osc::Type) -> Option<bool> {
    match arg {
        osc::Type::Int(i) => Some(*i != 0),
        osc::Type::Bool(b) => Some(*b),
        _ => None,
    }
}

fn seconds(arg: &osc::Type) -> Option<f32> {
    match arg {
        osc::Type::Float(f) => Some(*f),
        osc::Type::Int(i) => Some(*i as f32),
        _ => None,
    }
}

fn key(column: &osc::Type, row: &osc::Type) -> Option<GridKey> {
    Some(GridKey::new(index(column)?, index(row)?))
}

pub fn parse_message(addr: &str, args: &[osc::Type]) -> Option<WallCommand> {
    match (addr, args) {
        ("/wall/select", [column, row]) => key(column, row).map(WallCommand::Select),
        ("/wall/deselect", []) => Some(WallCommand::Deselect),
        ("/wall/ripple", [column, row]) => key(column, row).map(WallCommand::Ripple),
        ("/wall/morph", [osc::Type::String(name), duration]) => Some(WallCommand::Morph {
            layout: name.parse().ok()?,
            duration: seconds(duration)?,
        }),
        ("/wall/layout", [osc::Type::String(name)]) => name.parse().ok().map(WallCommand::JumpTo),
        ("/wall/physics", [enabled]) => flag(enabled).map(WallCommand::Physics),
        ("/wall/rebuild", [size]) => Some(WallCommand::Rebuild {
            size: index(size)?,
            tiles: None,
        }),
        ("/wall/rebuild", [size, tiles]) => Some(WallCommand::Rebuild {
            size: index(size)?,
            tiles: Some(index(tiles)?),
        }),
        ("/wall/content/mode", [osc::Type::String(mode)]) => match mode.trim().to_lowercase().as_str() {
            "matrix" => Some(WallCommand::ContentMode(AssignmentMode::Matrix)),
            "axis" => Some(WallCommand::ContentMode(AssignmentMode::Axis)),
            _ => None,
        },
        ("/wall/content/repeat", [enabled]) => flag(enabled).map(WallCommand::ContentRepeat),
        _ => None,
    }
}
