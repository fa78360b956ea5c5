//! 数学类型
//!
//! 基于 `nalgebra` 的向量别名，以及 RGBA 颜色类型。

pub use nalgebra::Vector3 as Vec3;

// 类型别名，使用更简洁的名称
pub type Vector3 = Vec3<f32>;

/// 颜色类型（RGBA，范围 0.0-1.0，直通 alpha）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const RED: Color = Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const GREEN: Color = Color { r: 0.0, g: 1.0, b: 0.0, a: 1.0 };
    pub const BLUE: Color = Color { r: 0.0, g: 0.0, b: 1.0, a: 1.0 };

    /// 创建新的颜色
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// 从整数值创建颜色（0-255）
    pub fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// sRGB 编码的颜色转换为线性值（alpha 不变）
    ///
    /// 渲染到 sRGB 格式的目标时，硬件会在写入时重新编码，
    /// 清除颜色必须先转换为线性值，写入结果才是原来的 8 位值。
    pub fn to_linear(&self) -> Self {
        fn decode(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        Self::new(decode(self.r), decode(self.g), decode(self.b), self.a)
    }

    /// 转换为数组
    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// 转换为 wgpu 清除颜色
    pub fn to_wgpu(&self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

impl From<[u8; 4]> for Color {
    fn from(rgba: [u8; 4]) -> Self {
        Color::from_rgba_u8(rgba[0], rgba[1], rgba[2], rgba[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_u8() {
        let color = Color::from([32, 103, 178, 255]);
        assert!((color.r - 32.0 / 255.0).abs() < 1e-6);
        assert!((color.b - 178.0 / 255.0).abs() < 1e-6);
        assert_eq!(color.a, 1.0);

        let clear = color.to_wgpu();
        assert!((clear.g - 103.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_color_to_array() {
        assert_eq!(Color::BLUE.to_array(), [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_color_to_linear() {
        // 端点和 alpha 不变
        assert_eq!(Color::RED.to_linear(), Color::RED);
        assert_eq!(Color::new(0.0, 0.0, 0.0, 0.5).to_linear().a, 0.5);

        let linear = Color::from([32, 103, 178, 255]).to_linear();
        assert!((linear.r - 0.0144).abs() < 1e-3);
        assert!((linear.g - 0.1356).abs() < 1e-3);
        assert!((linear.b - 0.4452).abs() < 1e-3);
        assert_eq!(linear.a, 1.0);
    }
}
