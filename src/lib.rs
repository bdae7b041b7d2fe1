/*
lib.rs

Copyright 2025 Hervé Quatremain

This file is part of Impostori.

Impostori is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Impostori is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Impostori. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Impostori puzzle generator.
//!
//! Impostori is a logic puzzle played on a grid of 36 hexagonal cells. Each cell has a role
//! (Detective, Worker, Imposter, or Vacant) and a value. The player sees the roles and the clues
//! shown between adjacent cells, and must find the values.

pub mod generator;
pub mod progress;
pub mod saver;
