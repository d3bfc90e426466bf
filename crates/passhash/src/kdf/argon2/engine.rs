//! Argon2 (RFC 9106): `H0` seeding, segment-wise memory filling and tag extraction.

use zeroize::{Zeroize, Zeroizing};

use super::block::{BLOCK_BYTES, Block, QWORDS_IN_BLOCK};
use super::config::{Argon2Config, SYNC_POINTS, Variant, Version};
use crate::codec::{le32, le32_len};
use crate::error::{ChfError, Result};
use crate::hash::blake2b::{Blake2b, blake2b_long};

pub const PREHASH_DIGEST_LENGTH: usize = 64;

/// The byte inputs of one Argon2 derivation. `secret` and `associated_data` may be empty.
#[derive(Clone, Copy, Default)]
pub struct Argon2Input<'a> {
    pub password: &'a [u8],
    pub salt: &'a [u8],
    pub secret: &'a [u8],
    pub associated_data: &'a [u8],
}

impl<'a> Argon2Input<'a> {
    pub fn new(password: &'a [u8], salt: &'a [u8]) -> Self {
        Self {
            password,
            salt,
            ..Self::default()
        }
    }
}

impl std::fmt::Debug for Argon2Input<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argon2Input")
            .field("salt", &hex::encode(self.salt))
            .finish_non_exhaustive()
    }
}

/// `H0 = BLAKE2b-512(p, T, m, t, v, y, len(P) P, len(S) S, len(K) K, len(X) X)`, all integers LE32.
///
/// `config` must already have its memory raised to the minimum, the stored `m` is hashed as is.
pub fn initial_hash(
    input: &Argon2Input<'_>,
    config: &Argon2Config,
) -> Result<Zeroizing<[u8; PREHASH_DIGEST_LENGTH]>> {
    let output_length = u32::try_from(config.output_length).unwrap_or(u32::MAX);
    let mut hasher = Blake2b::new(PREHASH_DIGEST_LENGTH)?;
    hasher.update(&le32(config.parallelism));
    hasher.update(&le32(output_length));
    hasher.update(&le32(config.memory_kib));
    hasher.update(&le32(config.iterations));
    hasher.update(&le32(config.version.number()));
    hasher.update(&le32(config.variant.code()));
    for field in [
        input.password,
        input.salt,
        input.secret,
        input.associated_data,
    ] {
        hasher.update(&le32_len(field)?);
        hasher.update(field);
    }
    let mut h0 = Zeroizing::new([0; PREHASH_DIGEST_LENGTH]);
    hasher.finalize_into_reset(h0.as_mut_slice());
    Ok(h0)
}

/// Derives `config.output_length` bytes.
///
/// # Errors
///
/// [`ChfError::BadParameters`] if `config` doesn't validate or the salt is empty.
pub fn derive_key(input: &Argon2Input<'_>, config: &Argon2Config) -> Result<Vec<u8>> {
    config.validate()?;
    if input.salt.is_empty() {
        return Err(ChfError::bad_parameters("Argon2 salt must not be empty"));
    }
    let config = config.with_minimum_memory();

    let h0 = initial_hash(input, &config)?;
    let mut memory = Memory::new(&config);
    memory.fill_first_blocks(&h0)?;
    memory.fill_passes();
    memory.finalize(config.output_length)
}

/// Position of the segment currently being filled.
#[derive(Clone, Copy, Debug)]
struct Position {
    pass: u32,
    lane: u32,
    slice: u32,
}

/// The block matrix of one derivation, `lanes` rows of `lane_length` blocks. Zeroed when dropped.
struct Memory {
    blocks: Vec<Block>,
    lanes: u32,
    lane_length: u32,
    segment_length: u32,
    passes: u32,
    variant: Variant,
    version: Version,
}

impl Memory {
    fn new(config: &Argon2Config) -> Self {
        let memory_blocks = config.memory_blocks();
        let segment_length = memory_blocks / (config.parallelism * SYNC_POINTS);
        Self {
            blocks: vec![Block::ZERO; memory_blocks as usize],
            lanes: config.parallelism,
            lane_length: segment_length * SYNC_POINTS,
            segment_length,
            passes: config.iterations,
            variant: config.variant,
            version: config.version,
        }
    }

    fn memory_blocks(&self) -> u32 {
        self.lanes * self.lane_length
    }

    /// `B[i][0] = H'(H0 || 0 || i)` and `B[i][1] = H'(H0 || 1 || i)`.
    fn fill_first_blocks(&mut self, h0: &[u8; PREHASH_DIGEST_LENGTH]) -> Result<()> {
        let mut bytes = Zeroizing::new([0u8; BLOCK_BYTES]);
        for lane in 0..self.lanes {
            for column in 0..2 {
                blake2b_long(bytes.as_mut_slice(), &[h0, &le32(column), &le32(lane)])?;
                let index = (lane * self.lane_length + column) as usize;
                self.blocks[index] = Block::from_bytes(bytes.as_slice());
            }
        }
        Ok(())
    }

    fn fill_passes(&mut self) {
        for pass in 0..self.passes {
            for slice in 0..SYNC_POINTS {
                // Segments of one slice only read blocks from finished slices of other lanes.
                for lane in 0..self.lanes {
                    self.fill_segment(Position { pass, lane, slice });
                }
            }
        }
    }

    fn is_data_independent(&self, position: Position) -> bool {
        match self.variant {
            Variant::I => true,
            Variant::D => false,
            Variant::Id => position.pass == 0 && position.slice < SYNC_POINTS / 2,
        }
    }

    fn fill_segment(&mut self, position: Position) {
        let mut addresses = self
            .is_data_independent(position)
            .then(|| AddressGenerator::new(position, self.memory_blocks(), self.passes, self.variant));

        let starting_index = if position.pass == 0 && position.slice == 0 {
            if let Some(addresses) = &mut addresses {
                addresses.next_block();
            }
            // The first two blocks of each lane are already seeded
            2
        } else {
            0
        };

        let mut current =
            position.lane * self.lane_length + position.slice * self.segment_length + starting_index;
        let mut previous = if current % self.lane_length == 0 {
            current + self.lane_length - 1
        } else {
            current - 1
        };

        for index in starting_index..self.segment_length {
            if current % self.lane_length == 1 {
                previous = current - 1;
            }

            let pseudo_rand = match &mut addresses {
                Some(addresses) => {
                    if index as usize % QWORDS_IN_BLOCK == 0 {
                        addresses.next_block();
                    }
                    addresses.address(index as usize)
                }
                None => self.blocks[previous as usize].word(0),
            };

            let ref_lane = if position.pass == 0 && position.slice == 0 {
                position.lane
            } else {
                ((pseudo_rand >> 32) % u64::from(self.lanes)) as u32
            };
            let ref_index = self.index_alpha(
                position,
                index,
                pseudo_rand as u32,
                ref_lane == position.lane,
            );

            let with_xor = self.version == Version::V13 && position.pass != 0;
            self.compress_into(
                current as usize,
                previous as usize,
                (ref_lane * self.lane_length + ref_index) as usize,
                with_xor,
            );

            current += 1;
            previous += 1;
        }

        if let Some(mut addresses) = addresses {
            addresses.zeroize();
        }
    }

    /// Runs `G` on the blocks at `previous` and `reference` and writes the block at `current`.
    /// The inputs are borrowed in place so no password dependent copies are left behind.
    fn compress_into(&mut self, current: usize, previous: usize, reference: usize, with_xor: bool) {
        debug_assert!(previous != current && reference != current);
        let (before, rest) = self.blocks.split_at_mut(current);
        let Some((target, after)) = rest.split_first_mut() else {
            unreachable!("block {current} is outside of memory");
        };
        let prev = if previous < current {
            &before[previous]
        } else {
            &after[previous - current - 1]
        };
        let reference = if reference < current {
            &before[reference]
        } else {
            &after[reference - current - 1]
        };
        target.fill(prev, reference, with_xor);
    }

    /// Maps the low 32 bits of the pseudo random value onto the blocks a segment may reference,
    /// biased towards recently written ones. Returns the column within `ref_lane`.
    fn index_alpha(&self, position: Position, index: u32, pseudo_rand: u32, same_lane: bool) -> u32 {
        let segment_length = self.segment_length;
        let reference_area_size = if position.pass == 0 {
            if position.slice == 0 {
                index - 1
            } else if same_lane {
                position.slice * segment_length + index - 1
            } else if index == 0 {
                position.slice * segment_length - 1
            } else {
                position.slice * segment_length
            }
        } else if same_lane {
            self.lane_length - segment_length + index - 1
        } else if index == 0 {
            self.lane_length - segment_length - 1
        } else {
            self.lane_length - segment_length
        };

        let reference_area_size = u64::from(reference_area_size);
        let relative_position = u64::from(pseudo_rand);
        let relative_position = (relative_position * relative_position) >> 32;
        let relative_position =
            reference_area_size - 1 - ((reference_area_size * relative_position) >> 32);

        let start_position = if position.pass != 0 && position.slice != SYNC_POINTS - 1 {
            u64::from((position.slice + 1) * segment_length)
        } else {
            0
        };

        ((start_position + relative_position) % u64::from(self.lane_length)) as u32
    }

    /// XORs the last block of every lane and stretches the result to `output_length` bytes.
    fn finalize(&self, output_length: usize) -> Result<Vec<u8>> {
        let mut final_block = Block::ZERO;
        for lane in 0..self.lanes {
            final_block ^= self.blocks[((lane + 1) * self.lane_length - 1) as usize];
        }
        let bytes = Zeroizing::new(final_block.to_bytes());
        final_block.zeroize();

        let mut tag = vec![0; output_length];
        blake2b_long(&mut tag, &[bytes.as_slice()])?;
        Ok(tag)
    }
}

impl Drop for Memory {
    fn drop(&mut self) {
        for block in &mut self.blocks {
            block.zeroize();
        }
    }
}

/// Produces the pseudo random values of data-independent addressing, 128 per block:
/// `address = G(0, G(0, input))` where `input` holds the position and a running counter.
struct AddressGenerator {
    input: Block,
    addresses: Block,
}

impl AddressGenerator {
    fn new(position: Position, memory_blocks: u32, passes: u32, variant: Variant) -> Self {
        let mut input = Block::ZERO;
        input.set_word(0, u64::from(position.pass));
        input.set_word(1, u64::from(position.lane));
        input.set_word(2, u64::from(position.slice));
        input.set_word(3, u64::from(memory_blocks));
        input.set_word(4, u64::from(passes));
        input.set_word(5, u64::from(variant.code()));
        Self {
            input,
            addresses: Block::ZERO,
        }
    }

    fn next_block(&mut self) {
        self.input.set_word(6, self.input.word(6) + 1);
        let mut tmp = Block::ZERO;
        tmp.fill(&Block::ZERO, &self.input, false);
        self.addresses.fill(&Block::ZERO, &tmp, false);
    }

    fn address(&self, index: usize) -> u64 {
        self.addresses.word(index % QWORDS_IN_BLOCK)
    }
}

impl Zeroize for AddressGenerator {
    fn zeroize(&mut self) {
        self.input.zeroize();
        self.addresses.zeroize();
    }
}
