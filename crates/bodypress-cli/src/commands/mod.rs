// BodyPress - Outbound Payload Compression
// Copyright (C) 2025 BodyPress Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.

pub mod algorithms;
pub mod compress;

pub use algorithms::AlgorithmsCmd;
pub use compress::CompressCmd;
