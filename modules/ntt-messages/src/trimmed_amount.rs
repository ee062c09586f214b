//! Amounts represented on the wire are capped at 8 decimals. This
//! means that any amount that's given as having more decimals is truncated to 8
//! decimals. On the way out, these amounts have to be scaled back to the
//! destination token's decimals. This module defines [`TrimmedAmount`], which
//! represents amounts that have been capped at 8 decimals.
//!
//! Trimming floors: the low-order digits beyond the cap are discarded and
//! never reported here. [`TrimmedAmount::remove_dust`] exists for custody code
//! that needs to leave those digits with the sender.

use std::io;

use wormhole_io::{Readable, Writeable};

use crate::errors::ScalingError;

pub const TRIMMED_DECIMALS: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrimmedAmount {
    pub amount: u64,
    pub decimals: u8,
}

impl TrimmedAmount {
    pub const SIZE: usize = 1 + 8;

    pub fn new(amount: u64, decimals: u8) -> Self {
        Self { amount, decimals }
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    // Integer division is allowed here. The purpose of using it here is to remove the remainder.
    #[allow(clippy::integer_division)]
    fn scale(amount: u128, from_decimals: u8, to_decimals: u8) -> Result<u128, ScalingError> {
        if from_decimals == to_decimals {
            return Ok(amount);
        }
        let power: u32 = from_decimals.abs_diff(to_decimals).into();
        // Exponentiation overflows u128 when `power` is greater than 38
        let scaling_factor = 10u128.checked_pow(power);

        if from_decimals > to_decimals {
            // every u128 floors to zero past 10^38
            Ok(scaling_factor.map_or(0, |factor| amount / factor))
        } else {
            amount
                .checked_mul(scaling_factor.ok_or(ScalingError::OverflowExponent)?)
                .ok_or(ScalingError::OverflowScaledAmount)
        }
    }

    /// Caps `amount` at `min(from_decimals, 8)` decimals.
    pub fn trim(amount: u128, from_decimals: u8) -> Result<TrimmedAmount, ScalingError> {
        Self::trim_to(amount, from_decimals, TRIMMED_DECIMALS)
    }

    /// Like [`TrimmedAmount::trim`], additionally capped at `to_decimals` so a
    /// destination token with fewer decimals never receives unrepresentable
    /// precision.
    pub fn trim_to(
        amount: u128,
        from_decimals: u8,
        to_decimals: u8,
    ) -> Result<TrimmedAmount, ScalingError> {
        let to_decimals = TRIMMED_DECIMALS.min(from_decimals).min(to_decimals);
        let scaled = Self::scale(amount, from_decimals, to_decimals)?;
        let amount = u64::try_from(scaled).map_err(|_| ScalingError::OverflowTrimmedAmount)?;
        Ok(Self {
            amount,
            decimals: to_decimals,
        })
    }

    /// Rescales to `to_decimals`, flooring when `to_decimals` is below
    /// `self.decimals`.
    pub fn untrim(&self, to_decimals: u8) -> Result<u128, ScalingError> {
        Self::scale(self.amount.into(), self.decimals, to_decimals)
    }

    /// Removes dust from an amount, returning the trimmed amount together with
    /// the amount with the dust removed (expressed in `from_decimals`).
    /// The two amounts returned are equivalent, but (potentially) expressed in
    /// different decimals.
    pub fn remove_dust(
        amount: u64,
        from_decimals: u8,
        to_decimals: u8,
    ) -> Result<(TrimmedAmount, u64), ScalingError> {
        let trimmed = Self::trim_to(amount.into(), from_decimals, to_decimals)?;
        let dedusted = u64::try_from(trimmed.untrim(from_decimals)?)
            .map_err(|_| ScalingError::OverflowScaledAmount)?;
        Ok((trimmed, dedusted))
    }
}

impl Readable for TrimmedAmount {
    const SIZE: Option<usize> = Some(1 + 8);

    fn read<R>(reader: &mut R) -> io::Result<Self>
    where
        Self: Sized,
        R: io::Read,
    {
        // The fields are read in reverse order compared to how they are declared
        // in the struct, matching the EVM encoding.
        let decimals = Readable::read(reader)?;
        let amount = Readable::read(reader)?;
        Ok(Self { amount, decimals })
    }
}

impl Writeable for TrimmedAmount {
    fn write<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        let TrimmedAmount { amount, decimals } = self;
        decimals.write(writer)?;
        amount.write(writer)?;

        Ok(())
    }

    fn written_size(&self) -> usize {
        Self::SIZE
    }
}
