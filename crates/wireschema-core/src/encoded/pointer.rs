// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use wireschema_type::{PointerVersion, Result, SchemaError};

use crate::schema::field::FieldDef;

use super::view::{View, ViewMut};

/// Header entity byte value signalling that the real 32-bit entity is
/// stored at the head of the payload.
pub const ENTITY_ESCAPE: u32 = 0xFF;

/// Size of the escaped entity word prepended to the payload.
const ENTITY_ESCAPE_SIZE: usize = 4;

const SIZE24_MASK: u32 = 0x00FF_FFFF;

/// Decoded offset-pointer header, version-independent.
///
/// `offset` is relative to the first byte of the header, `size` counts
/// elements, and `entity` is the element stride in bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OffsetPtr {
	pub offset: u32,
	pub size: u32,
	pub entity: u32,
}

/// Decode the pointer header under `view`.
///
/// Returns `None` when the field is not a pointer. For the default version
/// an escaped entity is read from the payload head and `offset` advances
/// past it, so element indexing starts at the data proper.
pub fn read_pointer(field: &FieldDef, view: &View<'_>) -> Result<Option<OffsetPtr>> {
	let Some(version) = field.pointer_version() else {
		return Ok(None);
	};
	let ptr = match version {
		PointerVersion::Default => {
			let offset = view.u32_at(0)?;
			let word = view.u32_at(4)?;
			let size = word & SIZE24_MASK;
			let entity = word >> 24;
			if entity == ENTITY_ESCAPE {
				let entity = view.view(offset as usize).u32_at(0)?;
				OffsetPtr {
					offset: offset + ENTITY_ESCAPE_SIZE as u32,
					size,
					entity,
				}
			} else {
				OffsetPtr {
					offset,
					size,
					entity,
				}
			}
		},
		PointerVersion::LegacyLong => OffsetPtr {
			offset: view.u32_at(0)?,
			size: view.u16_at(4)? as u32,
			entity: view.u16_at(6)? as u32,
		},
		PointerVersion::LegacyShort => OffsetPtr {
			offset: view.u16_at(0)? as u32,
			size: view.u16_at(2)? as u32,
			// The stride is implicit in the element layout.
			entity: field.pointer_element().map(|e| e.size as u32).unwrap_or(0),
		},
	};
	Ok(Some(ptr))
}

/// Encode the pointer header under `view`.
///
/// Legacy variants reject values beyond their header widths without
/// touching the buffer; the default version clamps the entity byte to the
/// escape marker (the real entity must have been placed by
/// [`alloc_pointer`]).
pub fn write_pointer(field: &FieldDef, view: &mut ViewMut<'_>, ptr: &OffsetPtr) -> Result<()> {
	let version = pointer_version(field)?;
	if view.size() < version.header_size() {
		return Err(SchemaError::OutOfBounds {
			index: version.header_size(),
			length: view.size(),
		});
	}
	match version {
		PointerVersion::Default => {
			let entity = ptr.entity.min(ENTITY_ESCAPE);
			view.write_u32_at(0, ptr.offset)?;
			view.write_u32_at(4, (ptr.size & SIZE24_MASK) | (entity << 24))?;
		},
		PointerVersion::LegacyLong => {
			if ptr.size > version.max_size() {
				return Err(out_of_range(field, "size", ptr.size, version.max_size()));
			}
			view.write_u32_at(0, ptr.offset)?;
			view.write_u16_at(4, ptr.size as u16)?;
			view.write_u16_at(6, ptr.entity as u16)?;
		},
		PointerVersion::LegacyShort => {
			if ptr.size > version.max_size() {
				return Err(out_of_range(field, "size", ptr.size, version.max_size()));
			}
			if ptr.offset > version.max_offset() {
				return Err(out_of_range(field, "offset", ptr.offset, version.max_offset()));
			}
			view.write_u16_at(0, ptr.offset as u16)?;
			view.write_u16_at(2, ptr.size as u16)?;
		},
	}
	Ok(())
}

/// Reserve the payload region at the current tail and encode the header.
///
/// `ptr.size` and `ptr.entity` are inputs; `ptr.offset` is set to the tail
/// (relative to the header) and, for an escaped default-version entity,
/// advanced past the prepended entity word so element indexing covers
/// `[offset, offset + size * entity)`.
pub fn alloc_pointer(field: &FieldDef, view: &mut ViewMut<'_>, ptr: &mut OffsetPtr) -> Result<()> {
	let version = pointer_version(field)?;
	ptr.offset = view.size() as u32;
	write_pointer(field, view, ptr)?;
	let tail = view.size();
	let mut items = view.view(tail);
	if ptr.entity >= ENTITY_ESCAPE && version == PointerVersion::Default {
		items.resize(ENTITY_ESCAPE_SIZE + ptr.entity as usize * ptr.size as usize);
		items.write_u32_at(0, ptr.entity)?;
		ptr.offset += ENTITY_ESCAPE_SIZE as u32;
	} else {
		items.resize(ptr.entity as usize * ptr.size as usize);
	}
	Ok(())
}

/// Overwrite only the size in an existing header, leaving offset and
/// entity intact. Used when a payload grows in place.
pub fn write_pointer_size(field: &FieldDef, view: &mut ViewMut<'_>, size: u32) -> Result<()> {
	match pointer_version(field)? {
		PointerVersion::Default => {
			let word = view.as_view().u32_at(4)?;
			view.write_u32_at(4, (word & !SIZE24_MASK) | (size & SIZE24_MASK))?;
		},
		PointerVersion::LegacyLong => view.write_u16_at(4, size as u16)?,
		PointerVersion::LegacyShort => view.write_u16_at(2, size as u16)?,
	}
	Ok(())
}

fn pointer_version(field: &FieldDef) -> Result<PointerVersion> {
	field.pointer_version().ok_or_else(|| SchemaError::BadSubType {
		field: field.name.clone(),
		reason: String::from("not a pointer field"),
	})
}

fn out_of_range(field: &FieldDef, what: &str, value: u32, max: u32) -> SchemaError {
	SchemaError::OutOfRange {
		what: format!("pointer `{}` {what}", field.name),
		value: value as i128,
		max: max as i128,
	}
}
